//! Single-GCN training entry point: one dataset, TF-IDF features, fixed
//! hyper-parameters, test micro-F1 on held-out masks.

use citebench::datasets::{self, synthetic, SyntheticConfig};
use citebench::text::Tfidf;
use citebench::utils::timing::Timer;
use citebench::{train_gcn, TrainGcnConfig};

fn main() {
    let mut dataset = match datasets::dblp("data") {
        Ok(ds) => ds,
        Err(e) => {
            println!("dataset skipped: {}", e);
            println!("falling back to the synthetic network");
            synthetic(&SyntheticConfig::default()).expect("synthetic dataset construction")
        }
    };

    let mut transformer = Tfidf::new();
    if let Err(e) = dataset.transform_features(&mut transformer) {
        println!("feature transformation failed: {}", e);
        return;
    }

    let _timer = Timer::new("train_gcn");
    let config = TrainGcnConfig::default();
    match train_gcn(&dataset, &config) {
        Ok(metrics) => {
            println!(
                "best val F1 {:.4} at epoch {}",
                metrics.best_val_f1, metrics.best_epoch
            );
        }
        Err(e) => println!("training failed: {}", e),
    }
}
