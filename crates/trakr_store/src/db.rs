use sea_orm::DeriveIden;

#[derive(DeriveIden, Clone, Copy)]
pub enum JobtrakrIds {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum JobtrakrLog {
    Table,
    Id,
    LoggedAt,
    Message,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Jobs {
    Table,
    Id,
    Code,
    Name,
    JobTypeId,
    CustomerId,
    JobLocation,
    StartDate,
    PlannedFinish,
    BidPrice,
    Longitude,
    Latitude,
    Radius,
    JobStatus,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Categories {
    Table,
    Id,
    JobId,
    Code,
    CategoryName,
    StartDate,
    EstPrice,
    CategoryStatus,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Items {
    Table,
    Id,
    CategoryId,
    Code,
    ItemName,
    EstPrice,
    ItemStatus,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum PictureBucket {
    Table,
    Id,
    CustomerId,
    JobId,
    DeviceId,
    FolderName,
    PictureName,
    DateAdded,
    PictureDate,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum ReceiptBucket {
    Table,
    Id,
    UserId,
    JobId,
    DeviceId,
    Amount,
    Vendor,
    Description,
    Notes,
    CategoryId,
    ItemId,
    AssetId,
    AlbumId,
    PictureUri,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Devices {
    Table,
    Id,
    UserId,
    Name,
    DeviceId,
    DeviceType,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Vendors {
    Table,
    Id,
    UserId,
    VendorName,
    Address,
    Address2,
    City,
    State,
    Zip,
    MobilePhone,
    BusinessPhone,
    Notes,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Todos {
    Table,
    Id,
    JobId,
    UserId,
    Todo,
    Completed,
}
