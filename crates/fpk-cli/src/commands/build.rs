use fpk_build::{Builder, FnpackRunner};
use fpk_core::BuilderConfig;
use std::path::Path;

/// Generate the package tree and, unless skipped, run fnpack on it.
pub fn build(input: &Path, output: Option<&Path>, skip_fnpack: bool) -> anyhow::Result<()> {
    if !input.is_dir() {
        return Err(fpk_core::Error::InputDirNotFound(input.to_path_buf()).into());
    }

    let config = BuilderConfig::load(input)?;
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.build.output_dir.clone());

    std::fs::create_dir_all(&output_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create output directory {}: {e}",
            output_dir.display()
        )
    })?;

    tracing::debug!(input = %input.display(), output = %output_dir.display(), "starting build");
    let builder = Builder::load(input, &output_dir)?;

    if skip_fnpack || config.packager.skip {
        builder.build()?;
        println!(
            "✓ FPK directory structure generated at: {}",
            builder.app_dir().display()
        );
    } else {
        // fpk.toml paths are relative to the input directory
        let runner =
            FnpackRunner::new().configured_path(config.packager.path.map(|p| input.join(p)));
        let package = builder.build_with_packager(&runner)?;
        println!("✓ FPK package built successfully: {}", package.display());
    }

    print_summary(&builder);
    Ok(())
}

fn print_summary(builder: &Builder) {
    println!();
    println!("Build Summary:");
    println!("  App Name:    {}", builder.app_name);
    println!("  Version:     {}", builder.version());
    println!("  Service:     {}", builder.variables.service_name);
    if !builder.variables.first_port.is_empty() {
        println!("  Port:        {}", builder.variables.first_port);
    }
}
