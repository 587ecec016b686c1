use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use qxor::dataset::SAMPLES;
use qxor::decode;
use qxor::eigen;
use qxor::report;
use qxor::train::TrainConfig;
use qxor::train::Trainer;
use qxor::update::UpdateVariant;

const PLOT_PATH: &str = "epochs.png";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    Registry::default().with(filter).with(fmt_layer).init();
}

fn main() -> Result<()> {
    init_tracing();

    let config = TrainConfig::default();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut trainer = Trainer::build(&SAMPLES, &config, UpdateVariant::default(), &mut rng)?;

    let records = trainer.train(config.epochs)?;
    report::print_epochs(records);

    let codes = decode::decode(&trainer)?;
    report::print_codes(&codes);

    let eigen = eigen::decompose(eigen::swap_matrix())?;
    eigen::print(&eigen);

    report::plot(trainer.history(), PLOT_PATH)
}
