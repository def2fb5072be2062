pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{complete, dim, error, header, info, phase, section, success, summary_row, timing, warn};
pub use progress::{ProgressManager, Spinner};
pub use progress_message::{ProgressMessage, ProgressPhase};
pub use table::{member_table, stats_table, MemberRow, TableBuilder};
pub use theme::{theme, Theme};
