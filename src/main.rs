use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::OffsetDateTime;

use pantry::app::{App, View};
use pantry::config::{AppConfig, StoreConfig, WireEncoding};
use pantry::dashboard::{recommended_menu, DashboardSummary};
use pantry::images::{compress_photo, DataUri, StillImageCamera};
use pantry::inventory::{take_photo, InventoryForm, InventoryItem, StorageLocation, Unit};
use pantry::profile::{DietPreference, Sex, UserProfile};
use pantry::shopping::{format_rupiah, total_price, ShoppingForm, ShoppingItem};
use pantry::state::AppState;
use pantry::store::de::format_date;
use pantry::ui::TerminalPrompt;

#[derive(Parser)]
#[command(name = "pantry", version, about = "Household pantry and weekly shopping list")]
struct Cli {
    /// Wire encoding for writes (form or json).
    #[arg(long, global = true)]
    encoding: Option<WireEncoding>,
    /// Base URL of the item store; collection URLs are derived from it.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Prefix prepended to every store URL.
    #[arg(long, global = true)]
    proxy: Option<String>,
    /// Answer every confirmation with yes.
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Household profile.
    #[command(subcommand)]
    Profile(ProfileCmd),
    /// Greeting, body stats, pantry and shopping totals.
    Dashboard,
    /// Items that have expired or expire soon.
    Notifications,
    /// Ideal portion per meal.
    Menu,
    /// Pantry items.
    #[command(subcommand)]
    Inventory(InventoryCmd),
    /// Weekly shopping list.
    #[command(subcommand)]
    Shopping(ShoppingCmd),
    /// Photo utilities.
    #[command(subcommand)]
    Photo(PhotoCmd),
}

#[derive(Subcommand)]
enum ProfileCmd {
    Show,
    Set(ProfileArgs),
}

#[derive(clap::Args)]
struct ProfileArgs {
    #[arg(long)]
    fullname: Option<String>,
    #[arg(long)]
    members: Option<u32>,
    /// cm
    #[arg(long)]
    height: Option<f64>,
    /// kg
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    age: Option<u32>,
    /// Free text, e.g. "olahraga ringan".
    #[arg(long)]
    activity: Option<String>,
    #[arg(long)]
    sex: Option<Sex>,
    #[arg(long)]
    diet: Option<DietPreference>,
}

#[derive(Subcommand)]
enum InventoryCmd {
    List,
    Show { id: u64 },
    Add(InventoryArgs),
    Edit {
        id: u64,
        #[command(flatten)]
        args: InventoryArgs,
    },
    Delete { id: u64 },
}

#[derive(clap::Args)]
struct InventoryArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    unit: Option<Unit>,
    #[arg(long)]
    store_at: Option<StorageLocation>,
    /// YYYY-MM-DD
    #[arg(long)]
    expires: Option<String>,
    /// Emoji or label used as the photo.
    #[arg(long, conflicts_with = "photo_file")]
    photo: Option<String>,
    /// Image file captured as the photo.
    #[arg(long)]
    photo_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ShoppingCmd {
    List,
    Add(ShoppingArgs),
    Edit {
        id: u64,
        #[command(flatten)]
        args: ShoppingArgs,
    },
    Delete { id: u64 },
}

#[derive(clap::Args)]
struct ShoppingArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    unit: Option<Unit>,
    /// Rupiah.
    #[arg(long)]
    price: Option<f64>,
}

#[derive(Subcommand)]
enum PhotoCmd {
    /// Shrinks an image the way pantry photos are shrunk before upload.
    Compress {
        file: PathBuf,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "pantry=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(base) = &cli.base_url {
        let keep = config.store.clone();
        config.store = StoreConfig {
            cors_proxy: keep.cors_proxy,
            encoding: keep.encoding,
            cache_bust: keep.cache_bust,
            timeout_secs: keep.timeout_secs,
            ..StoreConfig::with_base(base)
        };
    }
    if let Some(encoding) = cli.encoding {
        config.store.encoding = encoding;
    }
    if let Some(proxy) = cli.proxy.clone() {
        config.store.cors_proxy = Some(proxy);
    }

    let state = AppState::init(config).context("failed to set up the store client")?;
    let prompt = TerminalPrompt { assume_yes: cli.yes };
    let mut app = App::new(&state);
    let today = OffsetDateTime::now_utc().date();

    match cli.command {
        Command::Profile(ProfileCmd::Show) => {
            app.navigate(View::ProfileForm, &prompt).await?;
            match &app.profile.profile {
                Some(p) => print_profile(p),
                None => println!("No profile yet. Create one with `pantry profile set`."),
            }
        }
        Command::Profile(ProfileCmd::Set(args)) => {
            app.navigate(View::ProfileForm, &prompt).await?;
            let form = &mut app.profile.form;
            if let Some(v) = args.fullname {
                form.fullname = v;
            }
            if let Some(v) = args.members {
                form.memberoffamily = v.to_string();
            }
            if let Some(v) = args.height {
                form.height = v.to_string();
            }
            if let Some(v) = args.weight {
                form.weight = v.to_string();
            }
            if let Some(v) = args.age {
                form.ages = v.to_string();
            }
            if let Some(v) = args.activity {
                form.dailyactivities = v;
            }
            if let Some(v) = args.sex {
                form.sex = v;
            }
            if let Some(v) = args.diet {
                form.dietpreference = v;
            }
            let saved = app.save_profile(&prompt).await?;
            if let Some(msg) = &app.profile.message {
                println!("{}", msg);
            }
            print_profile(&saved);
        }
        Command::Dashboard => {
            if let Err(e) = app.navigate(View::Dashboard, &prompt).await {
                eprintln!("{}", e);
            }
            print_dashboard(&app.dashboard(today));
        }
        Command::Notifications => {
            app.navigate(View::Notifications, &prompt).await?;
            let alerts = app.notifications(today);
            if alerts.is_empty() {
                println!("Nothing is about to expire.");
            }
            for alert in alerts {
                println!("{}. {}", alert, alert.hint());
            }
        }
        Command::Menu => {
            println!("Ideal portion per meal:");
            for p in recommended_menu() {
                println!("  {} {:<20} {} g", p.icon, p.name, p.grams);
            }
        }
        Command::Inventory(cmd) => run_inventory(&mut app, cmd, &prompt).await?,
        Command::Shopping(cmd) => run_shopping(&mut app, cmd, &prompt).await?,
        Command::Photo(PhotoCmd::Compress { file, out }) => compress_file(file, out).await?,
    }

    Ok(())
}

async fn run_inventory(app: &mut App, cmd: InventoryCmd, prompt: &TerminalPrompt) -> anyhow::Result<()> {
    match cmd {
        InventoryCmd::List => {
            app.navigate(View::Inventory, prompt).await?;
            if app.inventory.items.is_empty() {
                println!("The pantry is empty.");
            }
            for item in &app.inventory.items {
                print_inventory_line(item);
            }
        }
        InventoryCmd::Show { id } => {
            app.navigate(View::InventoryItemDetail(id), prompt).await?;
            let item = app.inventory.find(id)?;
            let f = &item.fields;
            println!("#{} {}", item.id, f.name);
            println!("  amount:   {} {}", f.weight, f.unit.symbol());
            println!("  stored:   {}", f.store_at);
            println!("  expires:  {}", format_date(f.expired_at));
            println!("  photo:    {}", photo_label(&f.photo));
        }
        InventoryCmd::Add(args) => {
            app.navigate(View::AddInventoryItem, prompt).await?;
            apply_inventory(&mut app.inventory_form, args, prompt).await?;
            let saved = app.save_inventory(prompt).await?;
            print!("Added ");
            print_inventory_line(&saved);
        }
        InventoryCmd::Edit { id, args } => {
            app.navigate(View::EditInventoryItem(id), prompt).await?;
            apply_inventory(&mut app.inventory_form, args, prompt).await?;
            let saved = app.save_inventory(prompt).await?;
            print!("Updated ");
            print_inventory_line(&saved);
        }
        InventoryCmd::Delete { id } => {
            if app.delete_inventory(id, prompt).await? {
                println!("Deleted pantry item #{}.", id);
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

async fn apply_inventory(
    form: &mut InventoryForm,
    args: InventoryArgs,
    prompt: &TerminalPrompt,
) -> anyhow::Result<()> {
    if let Some(v) = args.name {
        form.name = v;
    }
    if let Some(v) = args.weight {
        form.weight = v.to_string();
    }
    if let Some(v) = args.unit {
        form.unit = v;
    }
    if let Some(v) = args.store_at {
        form.store_at = v;
    }
    if let Some(v) = args.expires {
        form.expired_at = v;
    }
    if let Some(v) = args.photo {
        form.photo = v;
    }
    if let Some(path) = args.photo_file {
        let camera = StillImageCamera { path };
        take_photo(form, &camera, prompt).await?;
    }
    Ok(())
}

async fn run_shopping(app: &mut App, cmd: ShoppingCmd, prompt: &TerminalPrompt) -> anyhow::Result<()> {
    match cmd {
        ShoppingCmd::List => {
            app.navigate(View::WeeklyShopping, prompt).await?;
            if app.shopping.items.is_empty() {
                println!("The shopping list is empty.");
            }
            for item in &app.shopping.items {
                print_shopping_line(item);
            }
            println!("Total: {}", format_rupiah(total_price(&app.shopping.items)));
        }
        ShoppingCmd::Add(args) => {
            app.navigate(View::AddShoppingItem, prompt).await?;
            apply_shopping(&mut app.shopping_form, args);
            let saved = app.save_shopping(prompt).await?;
            print!("Added ");
            print_shopping_line(&saved);
        }
        ShoppingCmd::Edit { id, args } => {
            app.navigate(View::EditShoppingItem(id), prompt).await?;
            apply_shopping(&mut app.shopping_form, args);
            let saved = app.save_shopping(prompt).await?;
            print!("Updated ");
            print_shopping_line(&saved);
        }
        ShoppingCmd::Delete { id } => {
            if app.delete_shopping(id, prompt).await? {
                println!("Deleted shopping item #{}.", id);
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

fn apply_shopping(form: &mut ShoppingForm, args: ShoppingArgs) {
    if let Some(v) = args.name {
        form.name = v;
    }
    if let Some(v) = args.weight {
        form.weight = v.to_string();
    }
    if let Some(v) = args.unit {
        form.unit = v;
    }
    if let Some(v) = args.price {
        form.price = v.to_string();
    }
}

async fn compress_file(file: PathBuf, out: Option<PathBuf>) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let format = image::guess_format(&bytes).context("not a recognised image file")?;
    let original = DataUri {
        mime: format.to_mime_type().to_string(),
        bytes: bytes.into(),
    };
    let compressed = DataUri::parse(&compress_photo(&original.encode()))?;
    println!(
        "{}: {} bytes -> {} bytes ({})",
        file.display(),
        original.bytes.len(),
        compressed.bytes.len(),
        compressed.mime
    );
    if let Some(out) = out {
        tokio::fs::write(&out, &compressed.bytes)
            .await
            .with_context(|| format!("failed to write {}", out.display()))?;
        println!("written to {}", out.display());
    }
    Ok(())
}

fn print_profile(p: &UserProfile) {
    let f = &p.fields;
    println!("#{} {}", p.id, f.fullname);
    println!("  household: {} people", f.memberoffamily);
    println!("  height:    {} cm", f.height);
    println!("  weight:    {} kg", f.weight);
    println!("  age:       {}", f.ages);
    println!("  activity:  {}", f.dailyactivities);
    println!("  sex:       {:?}", f.sex);
    println!("  diet:      {:?}", f.dietpreference);
}

fn print_dashboard(s: &DashboardSummary) {
    println!("Hello, {}!", s.greeting_name);
    println!("  BMI:            {:.1}", s.stats.bmi);
    println!("  Daily calories: {} kcal ({:?} activity)", s.stats.calories, s.stats.activity);
    println!(
        "  Pantry:         {} items, {} expiring soon",
        s.inventory_count, s.expiring_soon
    );
    println!(
        "  Shopping:       {} items, {}",
        s.shopping_count,
        format_rupiah(s.shopping_total)
    );
}

fn print_inventory_line(item: &InventoryItem) {
    let f = &item.fields;
    println!(
        "#{:<4} {:<20} {} {:<3} {:<16} exp {}",
        item.id,
        f.name,
        f.weight,
        f.unit.symbol(),
        f.store_at.to_string(),
        format_date(f.expired_at)
    );
}

fn print_shopping_line(item: &ShoppingItem) {
    let f = &item.fields;
    println!(
        "#{:<4} {:<20} {} {:<3} {}",
        item.id,
        f.name,
        f.weight,
        f.unit.symbol(),
        format_rupiah(f.price)
    );
}

fn photo_label(photo: &str) -> String {
    match DataUri::parse(photo) {
        Ok(uri) => format!("{} image, {} bytes", uri.mime, uri.bytes.len()),
        Err(_) => photo.to_string(),
    }
}
