pub mod ports;
pub mod search_by_id_use_case;
pub mod search_use_case;

pub use search_by_id_use_case::IdSearch;
pub use search_use_case::EventSearch;
