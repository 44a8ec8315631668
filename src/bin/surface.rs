use std::path::PathBuf;

use structopt::StructOpt;

use plot_solutions::{colormap::Strategy, plot_surface, Batch};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "surface",
    about = "Batch 3D plotting of wave equation solver output"
)]
struct Opt {
    /// Path to the solver results directory
    #[structopt(default_value = "Results")]
    path: PathBuf,
    /// Output directory for the charts [default: <path>/Images]
    #[structopt(short, long)]
    out: Option<PathBuf>,
    /// Color the points with the opacity ramp instead of the viridis
    /// colormap
    #[structopt(long)]
    fade: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let strategy = if opt.fade {
        Strategy::fade()
    } else {
        Strategy::viridis()
    };
    let mut batch = Batch::new(&opt.path).suffix("3D_plot");
    if let Some(out) = &opt.out {
        batch = batch.output_dir(out);
    }
    let summary = batch.run(|input, output| plot_surface(input, output, strategy))?;
    log::info!("{} plotted, {} failed", summary.processed, summary.failed);
    Ok(())
}
