//! Command-line demonstration: prints a binomial distribution's statistics,
//! its bar chart, and a few matrix operations.

use anyhow::Result;
use clap::Parser;
use u_numkit::random::{create_rng, BinomialSampler};
use u_numkit::{Binomial, Matrix};

#[derive(Parser)]
#[command(name = "binomial-demo")]
#[command(about = "Binomial distribution and matrix demo")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Number of trials (n)
    #[arg(short = 'n', long, default_value = "20")]
    trials: u64,

    /// Success probability (p)
    #[arg(short, long, default_value = "0.45")]
    probability: f64,

    /// Threshold k for the probability queries
    #[arg(short = 'k', long, default_value = "8")]
    threshold: u64,

    /// Width of the longest bar, in characters
    #[arg(long, default_value = "50")]
    width: usize,

    /// Number of random draws to print (0 = none)
    #[arg(long, default_value = "0")]
    samples: usize,

    /// Seed for the random draws
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let x = Binomial::new(cli.trials, cli.probability)?;
    let k = cli.threshold;

    println!("X -> {x}");
    println!("Expectation of X: {}", x.expected());
    println!("Variance of X:  {}", x.variance());
    println!("Sigma of X:  {}", x.sigma());
    match x.mass_at(k) {
        Ok(m) => println!("P(X={k})  = {m}"),
        Err(e) => println!("P(X={k})  = n/a ({e})"),
    }
    println!("P(X>{k})  = {}", x.probability_greater_than(k));
    println!("P(X>={k}) = {}", x.probability_greater_or_equal(k));
    println!("P(X<{k})  = {}", x.probability_less_than(k));
    println!("P(X<={k}) = {}", x.probability_less_or_equal(k));
    println!();

    print!("{}", render_bars(&x.bar_series(), cli.width));

    if cli.samples > 0 {
        let sampler = BinomialSampler::new(&x);
        let mut rng = create_rng(cli.seed);
        let draws: Vec<String> = (0..cli.samples)
            .map(|_| sampler.sample(&mut rng).to_string())
            .collect();
        println!();
        println!("Draws: {}", draws.join(" "));
    }

    println!();
    matrix_demo()?;
    Ok(())
}

/// Horizontal text bar chart of `(x, height)` pairs, scaled so the
/// tallest bar is `width` characters long.
fn render_bars(series: &[(u64, f64)], width: usize) -> String {
    let peak = series.iter().map(|&(_, h)| h).fold(0.0_f64, f64::max);
    let label_width = series.last().map_or(1, |&(x, _)| x.to_string().len());
    let mut out = String::new();
    for &(x, h) in series {
        let len = if peak > 0.0 {
            ((h / peak) * width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!("{x:>label_width$} | {} {h:.4}\n", "#".repeat(len)));
    }
    out
}

fn matrix_demo() -> Result<()> {
    let a = Matrix::new(vec![vec![1.0, 2.0, 3.0], vec![0.0, 4.0, -1.0]])?;
    let b = Matrix::new(vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 2.0, 0.0],
        vec![0.0, 0.0, 0.0],
    ])?;
    let e = Matrix::new(vec![
        vec![5.0, 5.0, 10.0],
        vec![0.0, 5.0, 5.0],
        vec![5.0, 5.0, 10.0],
    ])?;
    let f = Matrix::new(vec![
        vec![5.0, 5.0, 0.0],
        vec![10.0, 5.0, 5.0],
        vec![5.0, 5.0, 0.0],
    ])?;

    println!("A {} =\n{a}", a.shape());
    println!("B {} =\n{b}", b.shape());
    println!("A * B =\n{}", a.checked_mul(&b)?);
    let g = e.checked_add(&f)?;
    println!("E + F =\n{g}");
    println!("-(E + F) =\n{}", -&g);
    println!("I3 =\n{}", Matrix::identity(3)?);
    if let Err(err) = a.checked_add(&b) {
        println!("A + B -> {err}");
    }
    Ok(())
}
