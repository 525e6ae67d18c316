pub mod result_record;
pub mod result_table;
pub mod url_candidate;
pub mod url_validator;

pub use result_record::*;
pub use result_table::*;
pub use url_candidate::*;
pub use url_validator::*;
