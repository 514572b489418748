//! Crash reporting.
//!
//! The batch driver leaves breadcrumbs (stage and header) per thread and
//! counts finished headers; the panic hook turns them into a short report.
//!
//! ```ignore
//! use objcmeta::observability::{enter_header, header_finished};
//!
//! for file in files {
//!     let _header = enter_header(&file);
//!     analyze_file(&file, &analyzer)?;
//!     header_finished();
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    batch_progress, current_breadcrumb, enter_header, enter_stage, header_finished, start_batch,
    Breadcrumb, BreadcrumbScope, Stage,
};
pub use panic_hook::install_panic_hook;
