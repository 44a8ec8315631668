use std::path::PathBuf;

use structopt::StructOpt;

use plot_solutions::{colormap::Strategy, plot_slices, Batch, Selection};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "plot-solutions",
    about = "Batch 2D plotting of wave equation solver output"
)]
struct Opt {
    /// Path to the solver results directory
    #[structopt(default_value = "Results")]
    path: PathBuf,
    /// Output directory for the charts [default: <path>/Images]
    #[structopt(short, long)]
    out: Option<PathBuf>,
    /// Time slices to draw: all, first-last or first-mid-last
    #[structopt(short, long, default_value = "first-mid-last")]
    slices: String,
    /// Color the later slices with the viridis colormap instead of the
    /// opacity ramp
    #[structopt(long)]
    viridis: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let selection = match opt.slices.as_str() {
        "all" => Selection::All,
        "first-last" => Selection::FirstLast,
        "first-mid-last" => Selection::FirstMidLast,
        other => anyhow::bail!("unknown slice selection: {}", other),
    };
    let strategy = if opt.viridis {
        Strategy::viridis()
    } else {
        Strategy::fade()
    };
    let mut batch = Batch::new(&opt.path).suffix("2D_plot");
    if let Some(out) = &opt.out {
        batch = batch.output_dir(out);
    }
    let summary = batch.run(|input, output| plot_slices(input, output, selection, strategy))?;
    log::info!("{} plotted, {} failed", summary.processed, summary.failed);
    Ok(())
}
