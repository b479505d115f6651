pub type AlbumId = i64;
pub type PhotoId = i64;

/// id given to the synthetic root album. the remote service has no record for
/// it so it is never fetched
pub const ROOT_ID: AlbumId = -1;
