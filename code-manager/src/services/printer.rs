//! Printer listing and printing through CUPS (`lpstat` / `lpr`).

use std::io;
use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::app::AppContext;
use crate::error::{ManagerError, Result};
use crate::services::records::{get_code, missing_image};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemPrinter {
    pub name: String,
    pub status: String,
}

pub fn list_system_printers() -> Result<Vec<SystemPrinter>> {
    let output = Command::new("lpstat")
        .arg("-p")
        .output()
        .map_err(|e| command_error("lpstat", e))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        if stderr.contains("No destinations added") || stderr.contains("No printers") {
            return Ok(Vec::new());
        }
        return Err(ManagerError::Io(io::Error::other(format!(
            "lpstat -p failed: {}",
            stderr.trim()
        ))));
    }

    Ok(parse_lpstat_output(&stdout))
}

/// The system default destination, if one is set.
pub fn default_printer() -> Result<Option<String>> {
    let output = Command::new("lpstat")
        .arg("-d")
        .output()
        .map_err(|e| command_error("lpstat", e))?;
    Ok(parse_default_destination(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// Send a file to the print spooler. `None` prints to the default destination.
pub fn print_file(path: &Path, printer: Option<&str>) -> Result<()> {
    if !path.is_file() {
        return Err(missing_image(path));
    }

    let mut command = Command::new("lpr");
    if let Some(name) = printer.filter(|n| !n.trim().is_empty()) {
        command.arg("-P").arg(name);
    }
    let output = command
        .arg(path)
        .output()
        .map_err(|e| command_error("lpr", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ManagerError::Io(io::Error::other(format!(
            "lpr failed: {}",
            stderr.trim()
        ))));
    }

    tracing::info!(
        path = %path.display(),
        printer = printer.unwrap_or("default"),
        "File sent to print spooler"
    );
    Ok(())
}

/// Print a record's image. `printer` overrides the configured printer.
pub fn print_code(ctx: &AppContext, id: i64, printer: Option<&str>) -> Result<()> {
    let record = get_code(ctx, id)?;
    let printer = printer.or(ctx.config().printer.as_deref());
    print_file(&record.image_path, printer)
}

fn command_error(program: &str, err: io::Error) -> ManagerError {
    if err.kind() == io::ErrorKind::NotFound {
        return ManagerError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("the '{program}' command was not found. Is CUPS installed?"),
        ));
    }
    ManagerError::Io(io::Error::new(
        err.kind(),
        format!("failed to run {program}: {err}"),
    ))
}

fn parse_lpstat_output(stdout: &str) -> Vec<SystemPrinter> {
    let mut printers = Vec::new();

    for line in stdout.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("printer ") else {
            continue;
        };

        let mut parts = rest.splitn(2, ' ');
        let Some(name) = parts.next() else {
            continue;
        };
        let status = parts
            .next()
            .map(printer_state)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        printers.push(SystemPrinter {
            name: name.to_string(),
            status,
        });
    }

    printers
}

/// `is idle.  enabled since ...` -> `idle`, `disabled since ...` -> `disabled`.
fn printer_state(rest: &str) -> String {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix("is ").unwrap_or(rest);
    let sentence = rest.split('.').next().unwrap_or_default();
    let state = sentence.split(" since").next().unwrap_or_default();
    state.trim().to_string()
}

fn parse_default_destination(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix("system default destination:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parse_lpstat_lines() {
        let input = "printer Zebra_GK420 is idle.  enabled since Thu 01 Jan 00:00:00 1970\nprinter Office_Laser disabled since Thu 01 Jan 00:00:00 1970 -\n\treason unknown\nprinter Desk_Label now printing Desk_Label-12.  enabled since Thu 01 Jan 00:00:00 1970\n";
        let printers = parse_lpstat_output(input);

        assert_eq!(printers.len(), 3);
        assert_eq!(printers[0].name, "Zebra_GK420");
        assert_eq!(printers[0].status, "idle");
        assert_eq!(printers[1].name, "Office_Laser");
        assert_eq!(printers[1].status, "disabled");
        assert_eq!(printers[2].status, "now printing Desk_Label-12");
    }

    #[test]
    fn parse_default_destination_line() {
        assert_eq!(
            parse_default_destination("system default destination: Zebra_GK420\n"),
            Some("Zebra_GK420".to_string())
        );
        assert_eq!(parse_default_destination("no system default destination\n"), None);
    }

    #[test]
    fn printing_a_missing_file_fails_before_spooling() {
        let err = print_file(Path::new("/nonexistent/label_QR.png"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoError);
    }
}
