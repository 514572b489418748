//! Crash report printed when extraction panics.
//!
//! A panic almost always comes from one unusual header, so the report leads
//! with that header and how to rerun on it alone.

use super::context::{batch_progress, current_breadcrumb, Breadcrumb};
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let report = CrashReport {
            message: panic_message(info),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
            breadcrumb: current_breadcrumb(),
            progress: batch_progress(),
            span: tracing::Span::current().metadata().map(|m| m.name()),
        };
        eprintln!("\n{}", report.render());
        if std::env::var_os("RUST_BACKTRACE").is_some() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

struct CrashReport {
    message: String,
    location: Option<String>,
    breadcrumb: Breadcrumb,
    progress: (usize, usize),
    span: Option<&'static str>,
}

impl CrashReport {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "objcmeta {VERSION} crashed ({}, {})",
            std::env::consts::OS,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )];
        lines.push(format!("  panic:    {}", self.message));
        if let Some(location) = &self.location {
            lines.push(format!("  at:       {location}"));
        }

        let stage = self
            .breadcrumb
            .stage
            .map_or("starting up", |stage| stage.label());
        lines.push(format!("  while:    {stage}"));
        if let Some(span) = self.span {
            lines.push(format!("  span:     {span}"));
        }

        let (done, total) = self.progress;
        if total > 0 {
            lines.push(format!("  progress: {done} of {total} headers finished"));
        }

        match &self.breadcrumb.header {
            Some(header) => {
                lines.push(format!("  header:   {}", header.display()));
                lines.push(String::new());
                lines.push(format!(
                    "Copy {} into an empty directory and run `objcmeta extract` on it to reproduce.",
                    header.display()
                ));
            }
            None if std::env::var_os("RUST_BACKTRACE").is_none() => {
                lines.push(String::new());
                lines.push("Set RUST_BACKTRACE=1 for a stack trace.".to_string());
            }
            None => {}
        }

        lines.join("\n")
    }
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
