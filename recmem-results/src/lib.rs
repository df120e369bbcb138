pub mod layout;
pub mod report;
pub mod score;
pub mod table;

pub use layout::SessionLayout;
pub use report::{read_summaries, store_summary, write_summary};
pub use score::{Tally, explode, score};
pub use table::{StudyTable, TestTable};
