use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quiz_console::config::{DEFAULT_BASE_URL, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS};
use quiz_console::{
    AdminController, ClientConfig, ClientError, HttpQuestionBank, Page, QuizController, QuizParams,
    QuizSession, SubjectFilter, telemetry,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Root URL of the question-bank service
    #[arg(long, env = "QUIZ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Cookie header sent with every request (an existing login session)
    #[arg(long, env = "QUIZ_SESSION_COOKIE")]
    session_cookie: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "QUIZ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// File that receives log output
    #[arg(long, env = "QUIZ_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[command(subcommand)]
    page: PageArgs,
}

#[derive(Subcommand, Debug)]
enum PageArgs {
    /// Take a timed quiz
    Quiz {
        /// Quiz identifier issued by the service
        #[arg(long)]
        quiz_id: Option<String>,

        /// Number of questions in the quiz
        #[arg(long, default_value_t = 0)]
        total: usize,

        /// Time allowed, in seconds
        #[arg(long, default_value_t = 0)]
        timer: u64,
    },
    /// Manage the question bank
    Admin {
        /// Initial subject filter, or "All"
        #[arg(long, default_value = "All")]
        subject: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let config = ClientConfig::new(&args.base_url, args.session_cookie, args.timeout_secs, args.log_file)?;
    telemetry::init_tracing(&config.log_file)?;
    info!(base_url = %config.base_url, "starting");

    let bank = Arc::new(HttpQuestionBank::new(&config)?);
    let page = match args.page {
        PageArgs::Quiz {
            quiz_id,
            total,
            timer,
        } => {
            let params = QuizParams {
                quiz_id,
                total_questions: total,
                timer_seconds: timer,
            };
            let Some(session) = QuizSession::new(&params) else {
                info!(?params, "no quiz to run");
                println!("No quiz to run: a quiz id and at least one question are required.");
                return Ok(());
            };
            Page::Quiz(QuizController::new(bank, session))
        }
        PageArgs::Admin { subject } => {
            Page::Admin(AdminController::new(bank, SubjectFilter::from_name(&subject)))
        }
    };

    quiz_console::run(page).await
}
