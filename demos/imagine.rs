use apiframe_client::utils::response_ops::{task_id, task_status};
use apiframe_client::{ApiframeClient, Config, FetchRequest, ImagineRequest, ProcessMode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env (if .env present)
    Config::dotenv_load();
    tracing_subscriber::fmt::init();
    let cfg = Config::from_env()?;

    let client = ApiframeClient::with_config(cfg);
    let req = ImagineRequest::new("a lighthouse on a cliff at dawn, oil painting")
        .with_aspect_ratio("16:9")
        .with_process_mode(ProcessMode::Fast);
    let submitted = client.imagine(req).await?;
    println!("Submitted: {}", serde_json::to_string_pretty(&submitted)?);

    // One status check; the task finishes server-side.
    if let Some(id) = task_id(&submitted) {
        let task = client.fetch(FetchRequest::new(id)).await?;
        println!("Status: {}", task_status(&task).unwrap_or("unknown"));
    }
    Ok(())
}
