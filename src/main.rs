use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use imoveis_widget::navigation::Environment;
use imoveis_widget::sanitize::display_text;
use imoveis_widget::views::format_price;
use imoveis_widget::widget::{default_host_page, embed, has_container};
use imoveis_widget::{
    ListingKind, MemoryService, PropertyFilters, PropertyService, SupabaseService, Widget,
    WidgetConfig,
};

#[derive(Parser, Debug)]
#[command(name = "imoveis-widget", version, about = "Property listing widget host")]
struct Cli {
    /// Serve rows from a JSON file instead of Supabase
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Override WIDGET_ENV (development | production)
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount the widget at a page URL and write the host page with it embedded
    Render {
        #[arg(long, default_value = "/")]
        location: String,
        /// Host page to embed into; a bare page is used when omitted
        #[arg(long)]
        host: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run a listing query and print the results
    List {
        /// venda | aluguel
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one property
    Show { id: String },
    /// Print the distinct cities
    Cities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = WidgetConfig::from_env();
    if let Some(env) = &cli.env {
        config.environment = Environment::parse(env);
    }

    let service: Arc<dyn PropertyService> = match &cli.fixture {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading fixture {}", path.display()))?;
            let memory = MemoryService::from_json(&json)
                .with_context(|| format!("decoding fixture {}", path.display()))?;
            if memory.is_empty() {
                warn!("No readable properties in {}", path.display());
            } else {
                info!("📂 Loaded {} properties from {}", memory.len(), path.display());
            }
            Arc::new(memory)
        }
        None => Arc::new(SupabaseService::new(config.supabase.clone())?),
    };

    info!("🏠 Imóveis widget - {} ({:?})", service.source_name(), config.environment);

    match cli.command {
        Command::Render {
            location,
            host,
            out,
        } => render(&location, host, out, service, &config).await,
        Command::List {
            kind,
            city,
            min_price,
            max_price,
            search,
        } => {
            let kind = match kind.as_deref() {
                Some(raw) => Some(ListingKind::parse(raw).with_context(|| {
                    format!("unknown listing kind {raw:?}, expected venda or aluguel")
                })?),
                None => None,
            };
            let filters = PropertyFilters {
                min_price,
                max_price,
                ..PropertyFilters::default()
            }
            .with_kind(kind)
            .with_city(city.as_deref().unwrap_or_default())
            .with_search(search.as_deref().unwrap_or_default());

            if let Some(bucket) = filters.price_bucket() {
                info!("Price range: {}", bucket.label());
            }
            list(&filters, service.as_ref()).await
        }
        Command::Show { id } => show(&id, service.as_ref()).await,
        Command::Cities => {
            let cities = service.list_distinct_cities().await?;
            for city in &cities {
                println!("{city}");
            }
            info!("✅ {} cities", cities.len());
            Ok(())
        }
    }
}

async fn render(
    location: &str,
    host: Option<PathBuf>,
    out: Option<PathBuf>,
    service: Arc<dyn PropertyService>,
    config: &WidgetConfig,
) -> anyhow::Result<()> {
    let host_html = match &host {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading host page {}", path.display()))?,
        None => default_host_page(&config.container_id),
    };

    // A page without the container is not fatal: nothing is rendered
    if !has_container(&host_html, &config.container_id) {
        error!(
            "Widget container #{} not found. Please add <div id=\"{}\"></div> to your HTML.",
            config.container_id, config.container_id
        );
        return Ok(());
    }

    let widget = Widget::mount(location, service, config).await?;
    let page = embed(&host_html, &config.container_id, &widget.render())?;

    match out {
        Some(path) => {
            tokio::fs::write(&path, page)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("💾 Saved rendered page to {}", path.display());
        }
        None => println!("{page}"),
    }
    Ok(())
}

async fn list(filters: &PropertyFilters, service: &dyn PropertyService) -> anyhow::Result<()> {
    let properties = service.list_properties(filters).await?;
    info!("\n✅ Found {} properties\n", properties.len());

    for (i, property) in properties.iter().enumerate() {
        println!(
            "{}. {} ({})",
            i + 1,
            property.title,
            format_price(property.price, property.kind)
        );
        println!("   {} - {}", property.badge_label(), property.city);
        if let Some(neighborhood) = property.neighborhood_text() {
            println!("   Bairro: {}", neighborhood);
        }
        println!("   ID: {}", property.id);
        println!();
    }
    Ok(())
}

async fn show(id: &str, service: &dyn PropertyService) -> anyhow::Result<()> {
    let Some(property) = service.get_property(id).await? else {
        warn!("Imóvel não encontrado: {}", id);
        return Ok(());
    };

    println!("{}", property.title);
    println!("   {}", format_price(property.price, property.kind));
    println!("   {} - {}", property.badge_label(), property.city);
    if let Some(description) = display_text(&property.description) {
        println!("   {}", description);
    }
    let images = property.image_sequence();
    println!("   {} imagens", images.len());
    for feature in &property.detailed_features {
        println!("   • {}", feature.text);
    }
    Ok(())
}
