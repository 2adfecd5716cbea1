//! Check command implementation.
//!
//! Validates system requirements and configuration.

use crate::config::{validate_effective_config, Config};
use crate::process::{read_memory_report_blocking, smaps_path};
use crate::startup_checks::validate_requirements;

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procmem-api - System Check");
    println!("==============================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📁 Checking data sources...");
    match validate_requirements(config) {
        Ok(report) => {
            let flag = |ok: bool| if ok { "✅" } else { "❌" };
            println!("   {} running as root", flag(report.is_root));
            println!(
                "   {} {}/1/smaps readable",
                flag(report.proc_readable),
                config.proc_root().display()
            );
            println!(
                "   {} RAM snapshot {}",
                flag(report.ram_snapshot_present),
                config.ram_snapshot_path().display()
            );
            println!(
                "   {} CPU snapshot {}",
                flag(report.cpu_snapshot_present),
                config.cpu_snapshot_path().display()
            );
            all_ok &= report.all_ok();
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Own smaps is always readable, so this exercises the parser end to end.
    println!("\n💾 Checking memory map parsing...");
    let own = smaps_path(&config.proc_root(), std::process::id() as i32);
    match read_memory_report_blocking(&own, config.unit_divisor()) {
        Ok(report) if !report.is_empty() => {
            println!(
                "   ✅ Parsed {} regions of this process (size={:.2}, rss={:.2})",
                report.regions.len(),
                report.total_size_kib,
                report.total_resident_kib
            );
        }
        Ok(_) => {
            println!("   ⚠️  {} parsed to zero regions", own.display());
        }
        Err(e) => {
            println!("   ❌ Cannot read {}: {}", own.display(), e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
