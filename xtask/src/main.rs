// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Build automation for kube-ingress-domain
//!
//! Usage: cargo xtask <command>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "kube-ingress-domain";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for kube-ingress-domain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Create a release tarball
    Dist {
        /// Target triple (e.g., x86_64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },
    /// Install to system
    Install {
        #[arg(long, default_value = "/usr/local")]
        prefix: String,
    },
    /// Run the release binary's offline commands
    Smoke,
    /// Run CI checks (format, clippy, test, smoke)
    Ci,
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    let root = project_root()?;
    sh.change_dir(&root);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { integration } => test(&sh, integration),
        Commands::Dist { target } => dist(&sh, &root, target.as_deref()),
        Commands::Install { prefix } => install(&sh, &root, &prefix),
        Commands::Smoke => smoke(&sh, &root),
        Commands::Ci => ci(&sh, &root),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building {}...", BIN);
    if release {
        cmd!(sh, "cargo build --release").run()?;
    } else {
        cmd!(sh, "cargo build").run()?;
    }
    let profile = if release { "release" } else { "debug" };
    println!("✅ Build completed: target/{}/{}", profile, BIN);
    Ok(())
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    println!("🧪 Running tests...");
    if integration {
        cmd!(sh, "cargo test --test discovery_test --test domain_resolution_test").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }
    println!("✅ All tests passed");
    Ok(())
}

fn release_binary(root: &Path, target: Option<&str>) -> PathBuf {
    match target {
        Some(triple) => root.join("target").join(triple).join("release").join(BIN),
        None => root.join("target").join("release").join(BIN),
    }
}

fn build_release(sh: &Shell, target: Option<&str>) -> Result<()> {
    match target {
        Some(triple) => cmd!(sh, "cargo build --release --target {triple}").run()?,
        None => cmd!(sh, "cargo build --release").run()?,
    }
    Ok(())
}

fn dist(sh: &Shell, root: &Path, target: Option<&str>) -> Result<()> {
    println!("📦 Creating distribution package...");
    build_release(sh, target)?;

    let dist_dir = root.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(release_binary(root, target), dist_dir.join(BIN))?;

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = match target {
        Some(triple) => format!("{}-{}-{}.tar.gz", BIN, version, triple),
        None => format!("{}-{}.tar.gz", BIN, version),
    };
    cmd!(sh, "tar -czf {archive_name} -C dist {BIN}")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn install(sh: &Shell, root: &Path, prefix: &str) -> Result<()> {
    println!("📥 Installing {} to {}...", BIN, prefix);

    let binary = release_binary(root, None);
    if !binary.exists() {
        build_release(sh, None)?;
    }

    let bin_dir = Path::new(prefix).join("bin");
    sh.create_dir(&bin_dir)?;
    let install_path = bin_dir.join(BIN);
    sh.copy_file(&binary, &install_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&install_path, std::fs::Permissions::from_mode(0o755))?;
    }

    println!("✅ Installed to: {}", install_path.display());
    Ok(())
}

// Commands that need no cluster access.
fn smoke(sh: &Shell, root: &Path) -> Result<()> {
    build_release(sh, None)?;
    let binary = release_binary(root, None);

    cmd!(sh, "{binary} --version").run()?;
    let providers = cmd!(sh, "{binary} providers").read()?;
    for expected in ["minikube", "eks", "iks"] {
        anyhow::ensure!(
            providers.contains(expected),
            "provider '{}' missing from `{} providers` output",
            expected,
            BIN
        );
    }
    println!("✅ Smoke checks passed");
    Ok(())
}

fn ci(sh: &Shell, root: &Path) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n💨 Running smoke checks...");
    smoke(sh, root)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
