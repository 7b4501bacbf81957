//! `amirecon translate` — Show the parameter paths an image name maps to.

use amirecon_core::translate::ImageIdentity;
use clap::Args;

/// Arguments for the `translate` command.
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Raw image names, e.g. `bottlerocket-aws-k8s-1.24-x86_64-v1.14.3-0a1b2c3d`.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Executes the `translate` command.
///
/// Names that cannot be translated are reported and skipped.
///
/// # Errors
///
/// This command does not fail on malformed names.
pub fn execute(args: &TranslateArgs) -> anyhow::Result<()> {
    for name in &args.names {
        let Some(identity) = ImageIdentity::parse(name) else {
            tracing::warn!(name = %name, "cannot translate image name");
            println!("{name}: not a translatable image name");
            continue;
        };
        let paths = identity.parameter_paths();
        println!("{name}");
        println!("  shape:        {}", identity.shape);
        println!("  family:       {}", identity.family_name());
        println!("  architecture: {}", identity.architecture);
        println!("  version:      {}", identity.version);
        println!("  commit:       {}", identity.commit_prefix);
        println!("  with commit:  {}", paths.commit_qualified);
        println!("  version only: {}", paths.version_only);
    }
    Ok(())
}
