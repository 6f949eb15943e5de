use clap::Parser;
use log::warn;
use std::{fs, io, path::PathBuf};

use html2dast::cms::{CmaConfig, DEFAULT_BASE_URL};

/// Main entrypoint for html2dast when called as executable
#[derive(Parser)]
#[command(name = "html2dast", version, about)]
pub struct Cli {
    /// HTML file for processing. To read from standard input (stdin), use "-".
    pub file: String,

    /// Provide a filename for the output.
    /// To send to standard out (stdout), use "-".
    #[arg(short = 'o', long = "out-file")]
    pub output: Option<String>,

    /// Pretty-print the resulting JSON
    #[arg(short = 'p', long = "pretty")]
    pub pretty: bool,

    /// DatoCMS API token. Without one, images are not uploaded and show up as error nodes.
    #[arg(long = "api-token", env = "DATOCMS_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Id of the block model used to embed images
    #[arg(long = "image-block-id", env = "DATOCMS_IMAGE_BLOCK_ID", default_value = "")]
    pub image_block_id: String,

    /// Content Management API base URL
    #[arg(long = "base-url", env = "DATOCMS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Sandbox environment to upload to
    #[arg(long = "environment", env = "DATOCMS_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Log each conversion problem and upload step
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn cma_config(&self) -> Option<CmaConfig> {
        self.api_token.as_ref().map(|token| {
            CmaConfig::new(token.clone())
                .with_base_url(self.base_url.clone())
                .with_environment(self.environment.clone())
        })
    }
}

pub fn read_input(args: &Cli) -> String {
    match args.file.as_str() {
        "-" => match io::read_to_string(io::stdin()) {
            Ok(input) => input,
            Err(e) => {
                warn!("Unable to read from stdin: {e}");
                std::process::exit(1)
            }
        },
        _ => match fs::read_to_string(args.file.as_str()) {
            Ok(file_string) => file_string,
            Err(e) => {
                warn!("Unable to read file {:?}: {e}", &args.file.as_str());
                std::process::exit(1)
            }
        },
    }
}

pub fn read_output(args: &Cli) -> Option<PathBuf> {
    match args.output {
        Some(ref output) => {
            if output == "-" {
                None
            } else {
                Some(PathBuf::from(output))
            }
        }
        None => {
            if args.file == "-" {
                // stdin in, stdout out
                None
            } else {
                let mut out_destination = PathBuf::from(&args.file);
                out_destination.set_extension("json");
                Some(out_destination)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_next_to_input() {
        let args = Cli::parse_from(["html2dast", "page.html"]);
        assert_eq!(read_output(&args), Some(PathBuf::from("page.json")));
    }

    #[test]
    fn stdin_goes_to_stdout() {
        let args = Cli::parse_from(["html2dast", "-"]);
        assert_eq!(read_output(&args), None);
        let args = Cli::parse_from(["html2dast", "page.html", "-o", "-"]);
        assert_eq!(read_output(&args), None);
    }

    #[test]
    fn token_builds_config() {
        let args = Cli::parse_from([
            "html2dast",
            "page.html",
            "--api-token",
            "secret",
            "--base-url",
            "http://localhost:3000/",
        ]);
        let config = args.cma_config().unwrap();
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.base_url, "http://localhost:3000");
    }
}
