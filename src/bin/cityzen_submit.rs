//! Terminal client that files one complaint from local photos.
//!
//! ```text
//! cityzen-submit --citizen-uid b5Xf9kQ2 --category "Roads & Transport" \
//!     --title "Pothole on Mirpur Road" --accept-recommended photo1.jpg photo2.jpg
//! ```
//!
//! The location comes from the first photo's GPS tags; photos without them need a position:
//!
//! ```text
//! cityzen-submit ... --latitude 23.8103 --longitude 90.4125 photo1.jpg
//! ```

use clap::Parser;
use cityzen_core::client::api::READ_TIMEOUT;
use cityzen_core::client::debounce::RECOMMENDATION_DEBOUNCE;
use cityzen_core::client::{
    CategoryChoice, CityZenApi, ComplaintGateway, ImageSource, LocalDevice, NominatimGeocoder,
    RoleView, SubmissionFlow,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cityzen-submit", version, about = "Submit a CityZen complaint")]
struct Args {
    /// Backend base URL
    #[arg(long, env = "CITYZEN_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Firebase UID of the reporting citizen
    #[arg(long, env = "CITYZEN_CITIZEN_UID")]
    citizen_uid: String,

    /// Nominatim instance used for reverse geocoding
    #[arg(long, env = "NOMINATIM_URL", default_value = NominatimGeocoder::PUBLIC_URL)]
    nominatim_url: String,

    /// Category id or name
    #[arg(long)]
    category: String,

    /// Complaint title; defaults to the AI suggestion
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Position used when the first photo carries no EXIF GPS tags
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,

    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Authority company id to notify (repeatable)
    #[arg(long = "authority")]
    authorities: Vec<i32>,

    /// Also notify every recommended authority
    #[arg(long)]
    accept_recommended: bool,

    /// Photos to attach
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let api = Arc::new(CityZenApi::new(&args.api_url)?);

    let profile = api.profile(&args.citizen_uid).await?;
    let view = RoleView::for_user(&profile);
    if !view.can_submit_complaints() {
        anyhow::bail!("{} accounts cannot submit complaints", view.title());
    }

    let category = resolve_category(api.as_ref(), &args.category).await?;

    let device = Arc::new(LocalDevice::new(
        args.images.clone(),
        args.latitude.zip(args.longitude),
    ));
    let geocoder = Arc::new(NominatimGeocoder::new(&args.nominatim_url, READ_TIMEOUT)?);
    let mut flow = SubmissionFlow::new(api, device, geocoder, args.citizen_uid.clone());

    flow.start();
    let report = flow.capture_or_pick_image(ImageSource::Library).await?;
    for notice in report.notices() {
        println!("! {}", notice);
    }
    if let Some(ai) = &flow.draft().ai_result {
        println!("AI: {} ({}%)", ai.label, ai.confidence);
    }
    if let Some(location) = &flow.draft().location {
        println!("Location: {}", location.address);
    }

    if let Some(title) = &args.title {
        flow.set_title(title);
    }
    if let Some(description) = &args.description {
        flow.set_description(description);
    }
    let mut updates = flow.subscribe_recommendations();
    flow.select_category(category);

    if flow.draft().recommendation_input().is_some() {
        let wait = RECOMMENDATION_DEBOUNCE + READ_TIMEOUT;
        if tokio::time::timeout(wait, updates.changed()).await.is_err() {
            println!("! No authority recommendations received");
        }
    }

    let recommendations = flow.recommendations();
    for r in &recommendations {
        println!("Recommended: [{}] {} - {}", r.authority_id, r.authority_name, r.reason);
    }

    let mut chosen: Vec<i32> = args.authorities.clone();
    if args.accept_recommended {
        chosen.extend(recommendations.iter().map(|r| r.authority_id));
    }
    chosen.sort_unstable();
    chosen.dedup();
    for id in chosen {
        flow.toggle_authority(id);
    }

    if let Err(errors) = flow.prepare_submission() {
        anyhow::bail!("Missing info:\n{}", errors);
    }

    let created = flow.submit().await?;
    println!(
        "{} (id {}, {} image(s))",
        created.message,
        created.complaint.complaint.id,
        created.complaint.images.len()
    );

    Ok(())
}

async fn resolve_category(
    api: &dyn ComplaintGateway,
    wanted: &str,
) -> anyhow::Result<CategoryChoice> {
    let categories = api.categories().await?;
    let wanted = wanted.trim();

    categories
        .into_iter()
        .find(|c| c.id.to_string() == wanted || c.name.eq_ignore_ascii_case(wanted))
        .map(|c| CategoryChoice {
            id: c.id,
            name: c.name,
        })
        .ok_or_else(|| anyhow::anyhow!("Unknown category '{}'", wanted))
}
