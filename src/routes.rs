// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const WATCH_LIST: &str = "/to-watch/{kind}";
pub const COLLECTION: &str = "/{collection}";
pub const RECORD: &str = "/{collection}/{id}";
