use std::{fs, path::PathBuf};

use structopt::StructOpt;

use plot_solutions::Norms;

#[derive(Debug, StructOpt)]
#[structopt(name = "norms", about = "Error norms dashboards, one per scheme")]
struct Opt {
    /// Path to the consolidated norms table
    #[structopt(default_value = "Results/NormsResult/Norms.csv")]
    path: PathBuf,
    /// Output directory for the dashboards
    #[structopt(short, long, default_value = "Results/Images")]
    out: PathBuf,
    /// Single scheme label to render, e.g. E_FTBS [default: every scheme
    /// present in the table]
    #[structopt(short, long)]
    scheme: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    if !opt.path.exists() {
        println!("Error: File {} does not exist.", opt.path.display());
        return Ok(());
    }
    let norms = Norms::from_path(&opt.path)?;
    fs::create_dir_all(&opt.out)?;
    let schemes = match opt.scheme {
        Some(scheme) => vec![scheme],
        None => norms.schemes(),
    };
    for scheme in schemes {
        let artifact = opt.out.join(format!("{}_norms.png", scheme));
        if norms.dashboard(&scheme, &artifact)? {
            println!("Plot saved: {}", artifact.display());
        }
    }
    Ok(())
}
