use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};

use dmrvmsg::config::{
    CallFilter, MasterSpec, PeerSpec, RelayConfig, DEFAULT_COLOUR_CODE, DEFAULT_IDS,
    DEFAULT_MESSAGE, DEFAULT_MIN_REPLY_FRAMES,
};
use dmrvmsg::relay::Relay;

#[derive(Parser)]
#[command(name = "dmrvmsg")]
#[command(about = "DMR network relay that records calls and replies with a voice message")]
struct Cli {
    /// Station callsign
    callsign: String,

    /// Repeater ID to log in with
    dmrid: u32,

    /// Repeater-network master
    #[arg(value_name = "HOST:PORT:TG:PASSWORD")]
    master: MasterSpec,

    /// Vocoder server
    #[arg(value_name = "HOST:PORT")]
    vocoder: PeerSpec,

    /// Directory receiving call recordings
    #[arg(value_name = "DIR", default_value = ".")]
    recordings: PathBuf,

    /// Voice message played back after a call
    #[arg(short, long, default_value = DEFAULT_MESSAGE)]
    message: PathBuf,

    /// ID to callsign lookup file
    #[arg(long, default_value = DEFAULT_IDS)]
    ids: PathBuf,

    /// Minimum number of 20ms audio blocks in a call that triggers a reply
    #[arg(long, default_value_t = DEFAULT_MIN_REPLY_FRAMES)]
    min_frames: usize,

    /// Only reply to private calls
    #[arg(long)]
    private_only: bool,

    /// Colour code announced and used in transmitted bursts
    #[arg(long, default_value_t = DEFAULT_COLOUR_CODE,
          value_parser = clap::value_parser!(u8).range(0..16))]
    colour_code: u8,
}

impl Cli {
    fn into_config(self) -> RelayConfig {
        let mut cfg = RelayConfig::new(&self.callsign, self.dmrid, self.master, self.vocoder);

        cfg.recordings = self.recordings;
        cfg.message = self.message;
        cfg.ids = self.ids;
        cfg.min_reply_frames = self.min_frames;
        cfg.colour_code = self.colour_code;
        cfg.filter = if self.private_only {
            CallFilter::PrivateOnly
        } else {
            CallFilter::Any
        };

        cfg
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(0);
        },
    };

    let stop = Arc::new(AtomicBool::new(false));

    {
        let stop = stop.clone();

        let handler = ctrlc::set_handler(move || {
            info!("stop requested");
            stop.store(true, Ordering::Relaxed);
        });

        if let Err(e) = handler {
            warn!("unable to handle termination signals: {}", e);
        }
    }

    let result = Relay::new(&cli.into_config()).and_then(|mut relay| relay.run(&stop));

    if let Err(e) = result {
        error!("{}", e);
    }
}
