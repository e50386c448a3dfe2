use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use esp_cfg_image::{
    ParsedImage,
    FLASH_SECTOR_SIZE,
    IMAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "esp-cfg-image")]
#[command(about = "Configuration region image generator and parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a region image from a CSV file
    Generate {
        /// Input CSV file path
        input: PathBuf,

        /// Output binary file path
        output: PathBuf,

        /// Chip id used to derive the default device id and topic
        #[arg(short, long, value_parser = parse_u32, default_value = "0")]
        chip_id: u32,
    },
    /// Parse a region image to a CSV file
    Parse {
        /// Input binary file path
        input: PathBuf,

        /// Output CSV file path
        output: PathBuf,
    },
}

fn parse_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse::<u32>().map_err(|e| e.to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            chip_id,
        } => {
            println!("Parsing CSV file: {}", input.display());
            let record = esp_cfg_image::record_from_csv_file(&input, chip_id)?;

            println!("Generating region image...");
            esp_cfg_image::generate_image_file(&record, &output)?;

            println!("Successfully generated region image: {}", output.display());
            println!(
                "Size: {} bytes ({} sectors)",
                IMAGE_SIZE,
                IMAGE_SIZE / FLASH_SECTOR_SIZE
            );

            Ok(())
        }
        Commands::Parse { input, output } => {
            println!("Parsing binary file: {}", input.display());
            let image = ParsedImage::parse_file(&input)?;
            println!("Flag: {:?}, record in slot {}", image.flag, image.slot);
            if !image.is_committed() {
                println!("Warning: the image was left behind by an interrupted save");
            }

            println!("Writing CSV file...");
            esp_cfg_image::record_to_csv_file(&image.record, &output)?;

            println!("Successfully parsed region image to: {}", output.display());

            Ok(())
        }
    }
}
