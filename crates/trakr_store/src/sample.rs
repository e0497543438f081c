//! Demo rows for a fresh install.

use log::info;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::TrakrStore;
use crate::stores::{CategoryStore, ItemStore, JobStore};
use jobtrakr_core::{
    CategoryData, Created, ItemData, JobData, NamespaceId, TrakrError, TrakrResult, UniqueId,
};

struct SampleCategory {
    code: &'static str,
    name: &'static str,
    est_price: f64,
    items: &'static [(&'static str, &'static str, f64)],
}

const SAMPLE_CATEGORIES: &[SampleCategory] = &[
    SampleCategory {
        code: "100",
        name: "Pre-Construction",
        est_price: 1000.0,
        items: &[
            ("100.1", "Permit", 100.0),
            ("100.2", "Site Plan", 200.0),
            ("100.3", "Survey", 600.0),
        ],
    },
    SampleCategory {
        code: "200",
        name: "SiteWork",
        est_price: 2000.0,
        items: &[
            ("200.1", "Clear Trees and Brush", 9000.0),
            ("200.2", "Add silt socks", 1500.0),
            ("200.3", "Level lot", 1300.0),
        ],
    },
    SampleCategory {
        code: "300",
        name: "Concrete",
        est_price: 8000.0,
        items: &[
            ("300.1", "Footer", 12000.0),
            ("300.2", "Basement Walls", 25000.0),
            ("300.3", "Basement Floor", 1800.0),
        ],
    },
];

const SAMPLE_JOBS: &[(&str, &str, &str, f64)] = &[
    ("100", "Blacksmith Way Residence", "9940 Blacksmith Way", 1000.0),
    ("200", "Louisville Remodel", "Louisville, KY", 2000.0),
];

fn created_id(what: &str, created: Created) -> TrakrResult<UniqueId> {
    match created.id {
        Some(id) if created.status.is_success() => Ok(id),
        _ => Err(TrakrError::insert(format!(
            "sample {what} not created: {}",
            created.status
        ))),
    }
}

/// Creates the sample jobs with their categories and items. Returns the job ids.
pub async fn seed_sample_data(
    store: &TrakrStore,
    namespace: NamespaceId,
) -> TrakrResult<Vec<UniqueId>> {
    let jobs = JobStore::new(store.clone(), namespace);
    let categories = CategoryStore::new(store.clone(), namespace);
    let items = ItemStore::new(store.clone(), namespace);
    let today = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| TrakrError::invalid(err.to_string()))?;

    let mut job_ids = Vec::with_capacity(SAMPLE_JOBS.len());
    for (code, name, location, bid_price) in SAMPLE_JOBS {
        let job = JobData {
            code: Some((*code).to_string()),
            name: Some((*name).to_string()),
            customer_id: i64::from(namespace.as_u32()),
            job_location: Some((*location).to_string()),
            start_date: Some(today.clone()),
            bid_price: Some(*bid_price),
            job_status: Some("Active".to_string()),
            ..JobData::default()
        };
        let job_id = created_id("job", jobs.create_job(&job).await)?;

        for sample in SAMPLE_CATEGORIES {
            let category = CategoryData {
                job_id: Some(job_id),
                code: Some(sample.code.to_string()),
                category_name: Some(sample.name.to_string()),
                est_price: Some(sample.est_price),
                ..CategoryData::default()
            };
            let category_id =
                created_id("category", categories.create_category(&category).await)?;
            for (code, name, est_price) in sample.items {
                let item = ItemData {
                    category_id: Some(category_id),
                    code: Some((*code).to_string()),
                    item_name: Some((*name).to_string()),
                    est_price: Some(*est_price),
                    ..ItemData::default()
                };
                created_id("item", items.create_item(&item).await)?;
            }
        }
        info!("sample: seeded job {job_id}");
        job_ids.push(job_id);
    }
    Ok(job_ids)
}
