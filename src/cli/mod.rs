use crate::hub::ModelSource;
use clap::Parser;

#[derive(Parser)]
#[command(name = "checkpoint-fetch")]
#[command(version, about = "Download model checkpoints and example audio files", long_about = None)]
pub struct Cli {
	/// Hub to download the model checkpoints from; omit to only fetch the examples
	#[arg(long = "model_source", value_enum, env = "MODEL_SOURCE")]
	pub model_source: Option<ModelSource>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn model_source_is_optional() {
		let cli = Cli::try_parse_from(["checkpoint-fetch"]).unwrap();
		assert_eq!(cli.model_source, None);
	}

	#[test]
	fn model_source_accepts_both_hubs() {
		let cli = Cli::try_parse_from(["checkpoint-fetch", "--model_source", "modelscope"]).unwrap();
		assert_eq!(cli.model_source, Some(ModelSource::ModelScope));

		let cli = Cli::try_parse_from(["checkpoint-fetch", "--model_source=huggingface"]).unwrap();
		assert_eq!(cli.model_source, Some(ModelSource::HuggingFace));
	}

	#[test]
	fn unknown_model_source_is_rejected() {
		assert!(Cli::try_parse_from(["checkpoint-fetch", "--model_source", "github"]).is_err());
		assert!(Cli::try_parse_from(["checkpoint-fetch", "--model_source"]).is_err());
	}
}
