use clap::Parser;
use imb_architect::application::pipeline::BatchPipeline;
use imb_architect::domain::config::ImbConfig;
use imb_architect::domain::ports::AddressNormalizerBox;
use imb_architect::domain::queue::RecordQueue;
use imb_architect::domain::service_type::service_type_label;
use imb_architect::error::ImbError;
use imb_architect::infrastructure::gemini::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GeminiConfig, GeminiNormalizer,
};
use imb_architect::infrastructure::in_memory::InMemoryNormalizer;
use imb_architect::interfaces::csv::address_reader::{AddressReader, ColumnMapping};
use imb_architect::interfaces::csv::results_writer::ResultsWriter;
use imb_architect::logging::init_logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV file with a header row
    input: PathBuf,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append a Status column to the output
    #[arg(long)]
    with_status: bool,

    /// Barcode ID (2 digits)
    #[arg(long, default_value = "00")]
    barcode_id: String,

    /// Service Type ID (3 digits)
    #[arg(long, default_value = "300")]
    service_type_id: String,

    /// Mailer ID (6 or 9 digits)
    #[arg(long, default_value = "123456")]
    mailer_id: String,

    /// Sequence number of the first address
    #[arg(long, default_value_t = 1)]
    start_sequence: u64,

    /// 0-based street column; any column flag disables header detection
    #[arg(long)]
    street_col: Option<usize>,

    #[arg(long)]
    city_col: Option<usize>,

    #[arg(long)]
    state_col: Option<usize>,

    #[arg(long)]
    zip_col: Option<usize>,

    #[arg(long)]
    plus4_col: Option<usize>,

    /// JSON lookup table of standardized addresses, used instead of Gemini
    #[arg(long)]
    lookup: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Timeout for each normalizer request
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn imb_config(&self) -> ImbConfig {
        ImbConfig {
            barcode_id: self.barcode_id.clone(),
            service_type_id: self.service_type_id.clone(),
            mailer_id: self.mailer_id.clone(),
            start_sequence_number: self.start_sequence,
        }
    }

    fn column_mapping(&self) -> Option<ColumnMapping> {
        let mapping = ColumnMapping {
            street: self.street_col,
            city: self.city_col,
            state: self.state_col,
            zip: self.zip_col,
            plus4: self.plus4_col,
        };
        (mapping != ColumnMapping::default()).then_some(mapping)
    }

    fn normalizer(&self) -> Result<AddressNormalizerBox, ImbError> {
        if let Some(path) = &self.lookup {
            return Ok(Box::new(InMemoryNormalizer::from_path(path)?));
        }
        let api_key = self.api_key.clone().ok_or_else(|| {
            ImbError::Config("set GEMINI_API_KEY or --api-key, or pass --lookup".to_string())
        })?;
        let config = GeminiConfig {
            api_key,
            model: self.model.clone(),
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        };
        Ok(Box::new(GeminiNormalizer::new(config)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_logging(level).into_diagnostic()?;

    let config = cli.imb_config();
    if service_type_label(&config.service_type_id).is_none() {
        warn!(
            service_type_id = %config.service_type_id,
            "Service Type ID is not a known USPS service type"
        );
    }

    // Read addresses
    let file = File::open(&cli.input).into_diagnostic()?;
    let mut reader = AddressReader::new(file);
    if let Some(mapping) = cli.column_mapping() {
        reader = reader.with_mapping(mapping);
    }
    let mut addresses = Vec::new();
    for address in reader.addresses().into_diagnostic()? {
        match address {
            Ok(address) => addresses.push(address),
            Err(e) => warn!(error = %e, "Skipping unreadable row"),
        }
    }

    let mut queue = RecordQueue::new();
    let ingested = queue.ingest(addresses, config.start_sequence_number);
    info!(ingested, "Loaded addresses");

    let pipeline = BatchPipeline::new(cli.normalizer().into_diagnostic()?, config);
    pipeline.run(&mut queue).await;

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = ResultsWriter::new(sink).with_status(cli.with_status);
    writer.write_records(queue.records()).into_diagnostic()?;

    Ok(())
}
