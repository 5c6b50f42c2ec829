use clap::Parser;

#[derive(Parser)]
#[command(name = "krishi")]
#[command(about = "A farming assistant that answers in your language, online or offline.")]
#[command(version)]
pub struct Cli {
    /// Answer language (name or code, e.g. hindi / hi)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Skip the AI backends and answer from offline knowledge
    #[arg(short = 'o', long)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// User id for the conversation log
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Treat the query words as an incoming SMS body
    #[arg(long)]
    pub sms: bool,

    /// Current weather advice for a location
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    pub weather: Option<Vec<f64>>,

    /// With --weather, show the daily forecast instead
    #[arg(long, requires = "weather")]
    pub forecast: bool,

    /// Crop guidance, optionally for one crop
    #[arg(long, value_name = "CROP", num_args = 0..=1)]
    pub crop: Option<Option<String>>,

    /// With --crop, only this season (kharif, rabi, ...)
    #[arg(long, requires = "crop")]
    pub season: Option<String>,

    /// With --crop, only locations containing this text
    #[arg(long, requires = "crop")]
    pub location: Option<String>,

    /// Pest control guides, optionally matching a pest name
    #[arg(long, value_name = "PEST", num_args = 0..=1)]
    pub pest: Option<Option<String>>,

    /// With --pest, only pests affecting this crop
    #[arg(long, requires = "pest")]
    pub affecting: Option<String>,

    /// With --pest, only this severity (low, medium, high)
    #[arg(long, requires = "pest")]
    pub severity: Option<String>,

    /// Weather-related farming tips, optionally for one condition
    #[arg(long, value_name = "CONDITION", num_args = 0..=1)]
    pub tips: Option<Option<String>>,

    /// Show recent conversations
    #[arg(long)]
    pub history: bool,

    /// List supported languages
    #[arg(long)]
    pub languages: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Question text
    #[arg(num_args = 1..)]
    pub query: Vec<String>,
}
