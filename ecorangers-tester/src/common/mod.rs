pub mod util;

pub use util::{challenge_level_for_date, date_millis, parse_date, split_csv};
