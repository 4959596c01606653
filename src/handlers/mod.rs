pub mod health;
pub mod records;
pub mod watch;

pub use health::health_handler;
pub use records::{
    create_record_handler, delete_record_handler, get_record_handler, list_records_handler,
    replace_record_handler,
};
pub use watch::{add_watch_handler, watch_passthrough_handler};
