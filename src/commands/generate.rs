//! `generate` subcommand.
use anyhow::{Context, Result};
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write completions for `shell` to `writer`.
pub fn write_completions<W: Write>(
    shell: Shell,
    cmd: &mut clap::Command,
    writer: &mut W,
) {
    let name = cmd.get_name().to_owned();
    clap_complete::generate(shell, cmd, name, writer);
}

/// Write a man page for `cmd` and one per subcommand (named `hassert-check.1`
/// and so on) into `output_dir`, or the current directory when omitted.
/// Returns the paths written.
///
/// # Errors
///
/// Returns an error if the directory or a page cannot be created.
pub fn generate_man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = Vec::new();
    render_page(cmd.clone(), &output_dir, &mut written)?;
    render_subcommands(cmd, &output_dir, cmd.get_name(), &mut written)?;
    Ok(written)
}

fn render_page(
    cmd: clap::Command,
    output_dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = output_dir.join(format!("{}.1", cmd.get_name()));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    written.push(path);
    Ok(())
}

fn render_subcommands(
    cmd: &clap::Command,
    output_dir: &Path,
    prefix: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    for sub in cmd.get_subcommands() {
        let name = format!("{prefix}-{}", sub.get_name());
        // clap wants a 'static name; generation runs once per process.
        let leaked: &'static str = Box::leak(name.clone().into_boxed_str());
        render_page(
            sub.clone().name(leaked).disable_help_subcommand(true),
            output_dir,
            written,
        )?;
        render_subcommands(sub, output_dir, &name, written)?;
    }
    Ok(())
}
