use std::path::PathBuf;

use structopt::StructOpt;

use plot_solutions::plot_refinement;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "refinement",
    about = "Overlay of the final slices of runs at different grid resolutions"
)]
struct Opt {
    /// Solution files to overlay, the initial slice being drawn from the
    /// first one
    #[structopt(required = true)]
    files: Vec<PathBuf>,
    /// Output image path
    #[structopt(short, long, default_value = "Results/Images/refinement.png")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    if let Some(parent) = opt.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    plot_refinement(&opt.files, &opt.out)?;
    println!("Plot saved: {}", opt.out.display());
    Ok(())
}
