use clap::Parser;
use step_hash::HashMap;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_len", default_value_t = 1000)]
    target_len: usize,
    /// Remove every n-th key after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("Filling HashMap with {} string keys...", args.target_len);

    let mut map: HashMap<String, usize> = HashMap::new();
    let mut num_failures = 0;
    for i in 0..args.target_len {
        if map.insert(format!("key_{i:08}"), i).is_err() {
            num_failures += 1;
        }
    }

    if args.remove_every > 0 {
        for i in (0..args.target_len).step_by(args.remove_every) {
            let _ = map.remove(&format!("key_{i:08}"));
        }
    }

    println!("Inserted {} values into table", map.len());
    println!(
        "Capacity: {} (schedule position {})",
        map.capacity(),
        map.size_index()
    );
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );

    map.probe_histogram().print();
    map.debug_stats().print();
    println!("Number of failed inserts: {num_failures}");
}
