use std::path::Path;
use std::process::Command;

use trim_pipeline::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = PipelineConfig::from_env();

    println!(
        "trim-selfcheck: starting with work_dir={} output_dir={}",
        config.work_dir.display(),
        config.output_dir.display()
    );
    ensure_dir(&config.work_dir).await?;
    ensure_dir(&config.output_dir).await?;
    ensure_tool("ffmpeg")?;
    ensure_tool("ffprobe")?;

    println!("trim-selfcheck: ok");
    Ok(())
}

async fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {}", path.display(), e))?;

    // Writable, not just present
    tempfile::tempfile_in(path)
        .map_err(|e| anyhow::anyhow!("{} is not writable: {}", path.display(), e))?;
    Ok(())
}

fn ensure_tool(name: &str) -> anyhow::Result<()> {
    let output = Command::new(name)
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", name, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("{} -version failed: {:?}", name, output.status));
    }
    Ok(())
}
