//! Build script for flipdot-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates flipdot.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate flipdot.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=flipdot.toml");

    let config_path = Path::new("flipdot.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: flipdot.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds flipdot.toml as its configuration.          ║\n\
            ║  Please create one in the flipdot-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read flipdot.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in flipdot.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_angle(&config, &mut errors);
    validate_modes(&config, &mut errors);
    validate_scroll(&config, &mut errors);
    report(&errors);

    println!("cargo:warning=flipdot.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid configuration in flipdot.toml                    ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for section in ["panel", "host"] {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("Missing [{}] section", section)),
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = [
        ("panel", "tx_pin"),
        ("panel", "de_pin"),
        ("host", "tx_pin"),
        ("host", "rx_pin"),
    ];

    for (section, key) in pins {
        let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
            continue;
        };
        let valid = value
            .as_str()
            .and_then(|s| s.strip_prefix("gpio"))
            .and_then(|n| n.parse::<u8>().ok())
            .is_some_and(|n| n <= 29);
        if !valid {
            errors.push(format!("[{}] {} must be \"gpio0\"..\"gpio29\"", section, key));
        }
    }
}

fn validate_angle(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(angle) = config.get("angle") else {
        return;
    };

    if let Some(samples) = angle.get("samples") {
        match samples.as_integer() {
            Some(n) if (1..=9).contains(&n) && n % 2 == 1 => {}
            _ => errors.push("[angle] samples must be odd and 1-9".to_string()),
        }
    }

    for (min, max) in [("azimuth_min", "azimuth_max"), ("elevation_min", "elevation_max")] {
        let lo = angle.get(min).and_then(|v| v.as_integer());
        let hi = angle.get(max).and_then(|v| v.as_integer());
        if let (Some(lo), Some(hi)) = (lo, hi) {
            if lo > hi {
                errors.push(format!("[angle] {} must not exceed {}", min, max));
            }
        }
    }
}

fn validate_modes(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(modes) = config.get("modes") else {
        return;
    };

    if let Some(default) = modes.get("default") {
        if !matches!(default.as_str(), Some("clock" | "scroll" | "solar")) {
            errors.push("[modes] default must be 'clock', 'scroll' or 'solar'".to_string());
        }
    }

    if let Some(rotate_s) = modes.get("rotate_s") {
        if !matches!(rotate_s.as_integer(), Some(1..=65535)) {
            errors.push("[modes] rotate_s must be 1-65535".to_string());
        }
    }
}

fn validate_scroll(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(scroll) = config.get("scroll") else {
        return;
    };

    if let Some(text) = scroll.get("text") {
        match text.as_str() {
            Some(t) if t.len() <= 128 && t.is_ascii() => {}
            _ => errors.push("[scroll] text must be ASCII, at most 128 bytes".to_string()),
        }
    }

    if let Some(font) = scroll.get("font") {
        if !matches!(font.as_str(), Some("3x5" | "5x7" | "5x7_mono")) {
            errors.push("[scroll] font must be '3x5', '5x7' or '5x7_mono'".to_string());
        }
    }

    if let Some(interval) = scroll.get("interval_ms") {
        if !matches!(interval.as_integer(), Some(n) if n > 0) {
            errors.push("[scroll] interval_ms must be positive".to_string());
        }
    }

    if let Some(y) = scroll.get("y") {
        if !matches!(y.as_integer(), Some(0..=13)) {
            errors.push("[scroll] y must be 0-13".to_string());
        }
    }
}
