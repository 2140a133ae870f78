use std::process::ExitCode;

use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use sumcheck_study::{
    field::{to_i128, Goldilocks},
    hash::sponge::{HashReader, HashWriter},
    oracle::{Oracle, SparsePolynomial},
    sumcheck::{
        fiat_shamir, ChallengeRange, ProtocolEvent, ProtocolRun, RngChallenger, SamplingWidth,
        Session, SumcheckConfig,
    },
};
use tracing_forest::{util::LevelFilter, ForestLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

type F = Goldilocks;
type Keccak = sha3::Keccak256;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive sum-check over Goldilocks", long_about = None)]
struct Args {
    /// Target polynomial, e.g. "2*x1 + 3*x2*x3 + x4"
    #[arg(short = 'p', long, default_value = "2*x1 + 3*x2*x3 + x4")]
    poly: String,

    /// Number of variables; defaults to the highest index in the polynomial
    #[arg(short = 'n', long)]
    num_vars: Option<usize>,

    /// "full" or an integer range such as "2..=100"
    #[arg(short = 'c', long, default_value = "full")]
    challenges: ChallengeRange,

    /// Sample points per round; defaults to degree + 1
    #[arg(short = 'w', long)]
    sample_width: Option<usize>,

    /// Seed for the verifier's randomness
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Derive challenges from a Keccak transcript instead of an RNG
    #[arg(long)]
    fiat_shamir: bool,

    /// Print the run as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();
}

fn log_event(event: &ProtocolEvent<F>) {
    match event {
        ProtocolEvent::ClaimReceived { claimed_sum } => {
            tracing::info!(claimed_sum = to_i128(*claimed_sum), "prover claims")
        }
        ProtocolEvent::RoundChecked {
            round,
            poly,
            check,
            expected,
        } => tracing::info!(
            round,
            poly = %poly,
            check = to_i128(*check),
            expected = to_i128(*expected),
            "g(0) + g(1)"
        ),
        ProtocolEvent::ChallengeIssued {
            round, challenge, ..
        } => tracing::info!(round, challenge = to_i128(*challenge), "verifier challenge"),
        ProtocolEvent::FinalCheck {
            expected,
            oracle_eval,
        } => tracing::info!(
            expected = to_i128(*expected),
            oracle_eval = to_i128(*oracle_eval),
            "oracle query"
        ),
        ProtocolEvent::Finished(verdict) => tracing::info!(?verdict, "done"),
    }
}

fn interactive(
    session: &Session<F, &SparsePolynomial<F>>,
    seed: u64,
) -> Result<ProtocolRun<F>, sumcheck_study::Error> {
    let rng = SmallRng::seed_from_u64(seed);
    let mut challenger = RngChallenger::new(rng, session.cfg().challenge_range);
    session.run_observed(&mut challenger, log_event)
}

fn non_interactive(
    oracle: &SparsePolynomial<F>,
    cfg: &SumcheckConfig,
) -> Result<ProtocolRun<F>, sumcheck_study::Error> {
    let mut writer = HashWriter::<Vec<u8>, Keccak>::init(b"sumcheck");
    fiat_shamir::prove::<F, _, _>(&mut writer, oracle, cfg)?;
    let proof = writer.finalize();
    tracing::info!(bytes = proof.len(), "proof written");

    let mut reader = HashReader::<&[u8], Keccak>::init(&proof, b"sumcheck");
    fiat_shamir::verify(&mut reader, oracle, cfg)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let oracle = SparsePolynomial::<F>::parse(&args.poly, args.num_vars)?;
    let cfg = SumcheckConfig {
        challenge_range: args.challenges,
        sampling: args
            .sample_width
            .map_or(SamplingWidth::FromDegree, SamplingWidth::Fixed),
    };
    tracing::info!(
        poly = %oracle,
        n = oracle.arity(),
        degree = oracle.degree(),
        soundness_error = cfg.soundness_error::<F>(oracle.arity(), oracle.degree()),
        "target"
    );

    let run = if args.fiat_shamir {
        non_interactive(&oracle, &cfg)?
    } else {
        let seed = args.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "verifier randomness");
        interactive(&Session::new(&oracle, cfg)?, seed)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        println!("{:?}", run.verdict);
    }

    Ok(if run.is_accepted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
