use log::debug;
use sea_orm::ConnectionTrait;

use crate::allocator::next_sequence;
use jobtrakr_core::{AllocationError, NamespaceId, UniqueId};

/// Mints a primary key for `namespace` from the store's next sequence value.
///
/// Run this inside the same exclusive transaction as the insert that uses the
/// id; see [`crate::TrakrStore::create_row`]. Allocation failures are returned
/// as-is and never retried.
pub async fn build_unique_id<C: ConnectionTrait>(
    conn: &C,
    namespace: NamespaceId,
) -> Result<UniqueId, AllocationError> {
    let sequence = next_sequence(conn).await?;
    let id = UniqueId::compose(namespace, sequence)?;
    debug!("ids: sequence {sequence} in namespace {namespace} => {id}");
    Ok(id)
}
