pub mod entry_service;
pub mod report_service;
pub mod seed_service;
pub mod sync_service;

pub use entry_service::{
    EntryFlow, EntryForm, EntryOutcome, EntryService, EntryState, RejectReason,
    DEFAULT_DUPLICATE_WINDOW_SECS,
};
pub use report_service::{
    ChartBar, ListView, ReportService, WeeklyReport, DEFAULT_REPORT_WINDOW_DAYS,
    MAX_REPORT_WINDOW_DAYS,
};
pub use seed_service::SeedService;
pub use sync_service::{SyncHandle, SyncOutcome, SyncService, DEFAULT_SYNC_DELAY_MS};
