// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::geometry::MergedGeometry;
use crate::io::ImportReport;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished OBJ import
    pub fn report_import(file: &str, geometry: &MergedGeometry, report: &ImportReport, duration: Duration) {
        Self::header("Imported:", file);
        Self::print_count("Vertices:", geometry.vertex_count());
        Self::print_count("Normals:", geometry.normals.len());
        Self::print_count("Faces:", geometry.polygon_count());
        Self::print_plan(report);
        Self::print_timing(duration);
        Self::footer();
    }

    /// Report a finished PLY point import
    pub fn report_points(file: &str, points: usize, declared: usize, report: &ImportReport, duration: Duration) {
        Self::header("Imported:", file);
        let count = if points == declared {
            points.to_string().cyan()
        } else {
            format!("{} (header declares {})", points, declared).yellow()
        };
        println!("  {} {}", "Points:".bright_black(), count);
        Self::print_plan(report);
        Self::print_timing(duration);
        Self::footer();
    }

    fn header(label: &str, file: &str) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", label.bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());
    }

    fn footer() {
        println!("{}", "━".repeat(80).bright_black());
    }

    fn print_count(name: &str, value: usize) {
        println!("  {} {}", name.bright_black(), value.to_string().cyan());
    }

    fn print_plan(report: &ImportReport) {
        println!(
            "  {} {} chunks on {} workers ({}, {} bytes)",
            "Plan:".bright_black(),
            report.chunks,
            report.workers,
            report.backend.as_str(),
            report.bytes
        );
        let malformed = if report.malformed_lines == 0 {
            "0".green()
        } else {
            report.malformed_lines.to_string().yellow()
        };
        println!("  {} {}", "Malformed lines:".bright_black(), malformed);
    }

    fn print_timing(duration: Duration) {
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
