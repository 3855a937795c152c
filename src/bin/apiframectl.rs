use apiframe_client::task::requests::*;
use apiframe_client::utils::response_ops::collect_image_urls;
use apiframe_client::{ApiframeClient, AppResult, Config};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "apiframectl", about = "CLI for the Apiframe image generation API", version)]
struct Cli {
    /// Override APIFRAME_API_KEY
    #[arg(global = true, long)]
    api_key: Option<String>,

    /// Override APIFRAME_BASE_URL
    #[arg(global = true, long)]
    base_url: Option<String>,

    /// Log every response body (and request logs) to stderr
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct WebhookArgs {
    /// The final result of the task is posted to this URL
    #[arg(long, value_name = "URL")]
    webhook_url: Option<String>,
    /// Sent as x-webhook-secret in the webhook call
    #[arg(long, value_name = "SECRET")]
    webhook_secret: Option<String>,
}

impl From<WebhookArgs> for Webhook {
    fn from(args: WebhookArgs) -> Self {
        Webhook { webhook_url: args.webhook_url, webhook_secret: args.webhook_secret }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate four images from a text prompt
    Imagine {
        prompt: String,
        #[arg(long, default_value = DEFAULT_ASPECT_RATIO)]
        aspect_ratio: String,
        /// fast or turbo
        #[arg(long, default_value = "fast")]
        process_mode: ProcessMode,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Upscale one image (1-4) of an imagine grid
    Upscale1x {
        parent_task_id: String,
        index: u8,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Subtle or creative upscale of an upscaled image
    UpscaleAlt {
        parent_task_id: String,
        /// subtle or creative
        #[arg(long = "type")]
        kind: UpscaleAltType,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// 2x or 4x high resolution upscale
    UpscaleHighres {
        parent_task_id: String,
        /// 2x or 4x
        #[arg(long = "type")]
        kind: UpscaleHighresType,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// New grid from a previous imagine task
    Reroll {
        parent_task_id: String,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long, default_value = DEFAULT_ASPECT_RATIO)]
        aspect_ratio: String,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Four variations of one image (1-4, strong or subtle)
    Variations {
        parent_task_id: String,
        index: VariationIndex,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long, default_value = DEFAULT_ASPECT_RATIO)]
        aspect_ratio: String,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Redraw a masked region of an upscaled image
    Inpaint {
        parent_task_id: String,
        /// Mask image file, base64-encoded before sending
        #[arg(long, value_name = "PATH", conflicts_with = "mask")]
        mask_file: Option<PathBuf>,
        /// Mask as a base64 string
        #[arg(long)]
        mask: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Zoom out an upscaled image (ratio between 1 and 2)
    Outpaint {
        parent_task_id: String,
        zoom_ratio: f64,
        #[arg(long, default_value = DEFAULT_ASPECT_RATIO)]
        aspect_ratio: String,
        #[arg(long)]
        prompt: Option<String>,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Extend an upscaled image in one direction
    Pan {
        parent_task_id: String,
        /// up, down, left or right
        direction: PanDirection,
        #[arg(long)]
        prompt: Option<String>,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Four prompts describing an image
    Describe {
        image_url: String,
        #[arg(long, default_value = "fast")]
        process_mode: ProcessMode,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Blend 2 to 5 images
    Blend {
        #[arg(required = true, num_args = 2..=5)]
        image_urls: Vec<String>,
        /// square, portrait or landscape
        #[arg(long, default_value = "square")]
        dimension: BlendDimension,
        #[arg(long, default_value = "fast")]
        process_mode: ProcessMode,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Seed of a generated image
    Seed {
        task_id: String,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Swap the face of the target image with the face of the swap image
    Faceswap {
        target_image_url: String,
        swap_image_url: String,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Status and result of a task
    Fetch {
        task_id: String,
        /// Print only the image URLs found in the result
        #[arg(long)]
        urls: bool,
    },
    /// Status and result of 2 to 20 tasks
    FetchMany {
        #[arg(required = true, num_args = 2..=20)]
        task_ids: Vec<String>,
        /// Print only the image URLs found in the results
        #[arg(long)]
        urls: bool,
    },
    /// Credits, plan and usage of the account
    Account,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    // Flags override the environment field by field.
    let mut conf = match Config::from_env_with_key(cli.api_key) {
        Ok(c) => {
            let verbose = cli.verbose || c.verbose();
            c.with_verbose(verbose)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    if let Some(url) = cli.base_url {
        conf = conf.with_base_url(url);
    }
    let client = ApiframeClient::with_config(conf);

    let mut urls_only = false;
    let res = match cli.command {
        Commands::Imagine { prompt, aspect_ratio, process_mode, webhook } => {
            let req = ImagineRequest::new(prompt)
                .with_aspect_ratio(aspect_ratio)
                .with_process_mode(process_mode)
                .with_webhook(webhook.into());
            client.imagine(req).await
        }
        Commands::Upscale1x { parent_task_id, index, webhook } => {
            client.upscale_1x(Upscale1xRequest::new(parent_task_id, index).with_webhook(webhook.into())).await
        }
        Commands::UpscaleAlt { parent_task_id, kind, webhook } => {
            client.upscale_alt(UpscaleAltRequest::new(parent_task_id, kind).with_webhook(webhook.into())).await
        }
        Commands::UpscaleHighres { parent_task_id, kind, webhook } => {
            client
                .upscale_highres(UpscaleHighresRequest::new(parent_task_id, kind).with_webhook(webhook.into()))
                .await
        }
        Commands::Reroll { parent_task_id, prompt, aspect_ratio, webhook } => {
            let mut req = RerollRequest::new(parent_task_id).with_aspect_ratio(aspect_ratio);
            if let Some(p) = prompt {
                req = req.with_prompt(p);
            }
            client.reroll(req.with_webhook(webhook.into())).await
        }
        Commands::Variations { parent_task_id, index, prompt, aspect_ratio, webhook } => {
            let mut req = VariationsRequest::new(parent_task_id, index).with_aspect_ratio(aspect_ratio);
            if let Some(p) = prompt {
                req = req.with_prompt(p);
            }
            client.variations(req.with_webhook(webhook.into())).await
        }
        Commands::Inpaint { parent_task_id, mask_file, mask, prompt, webhook } => {
            let mask = match (mask_file, mask) {
                (Some(path), None) => STANDARD.encode(tokio::fs::read(&path).await?),
                (None, Some(m)) => m,
                _ => {
                    eprintln!("Must provide either --mask-file <path> or --mask <base64>");
                    std::process::exit(2);
                }
            };
            let mut req = InpaintRequest::new(parent_task_id, mask);
            if let Some(p) = prompt {
                req = req.with_prompt(p);
            }
            client.inpaint(req.with_webhook(webhook.into())).await
        }
        Commands::Outpaint { parent_task_id, zoom_ratio, aspect_ratio, prompt, webhook } => {
            let mut req = OutpaintRequest::new(parent_task_id, zoom_ratio).with_aspect_ratio(aspect_ratio);
            if let Some(p) = prompt {
                req = req.with_prompt(p);
            }
            client.outpaint(req.with_webhook(webhook.into())).await
        }
        Commands::Pan { parent_task_id, direction, prompt, webhook } => {
            let mut req = PanRequest::new(parent_task_id, direction);
            if let Some(p) = prompt {
                req = req.with_prompt(p);
            }
            client.pan(req.with_webhook(webhook.into())).await
        }
        Commands::Describe { image_url, process_mode, webhook } => {
            let req = DescribeRequest::new(image_url).with_process_mode(process_mode);
            client.describe(req.with_webhook(webhook.into())).await
        }
        Commands::Blend { image_urls, dimension, process_mode, webhook } => {
            let req = BlendRequest::new(image_urls)
                .with_dimension(dimension)
                .with_process_mode(process_mode);
            client.blend(req.with_webhook(webhook.into())).await
        }
        Commands::Seed { task_id, webhook } => {
            client.seed(SeedRequest::new(task_id).with_webhook(webhook.into())).await
        }
        Commands::Faceswap { target_image_url, swap_image_url, webhook } => {
            let req = FaceswapRequest::new(target_image_url, swap_image_url);
            client.faceswap(req.with_webhook(webhook.into())).await
        }
        Commands::Fetch { task_id, urls } => {
            urls_only = urls;
            client.fetch(FetchRequest::new(task_id)).await
        }
        Commands::FetchMany { task_ids, urls } => {
            urls_only = urls;
            client.fetch_many(FetchManyRequest::new(task_ids)).await
        }
        Commands::Account => client.account().await,
    };

    print_result(res, urls_only)
}

fn print_result(res: AppResult<Value>, urls_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    match res {
        Ok(v) if urls_only => {
            let urls = collect_image_urls(&v);
            if urls.is_empty() {
                eprintln!("No image URLs in response (task may still be processing)");
            }
            for u in urls {
                println!("{}", u);
            }
            Ok(())
        }
        Ok(v) => {
            println!("{}", serde_json::to_string_pretty(&v)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
