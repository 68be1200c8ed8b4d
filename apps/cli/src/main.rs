use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{config::load_settings, FilterChange, MealPlannerClient, RefreshOutcome};
use shared::domain::{DietaryTag, MealType, PlannedMeal, PlannedMealId, Recipe, RecipeId};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "feastbliss", about = "Browse recipes and manage the planned meal list")]
struct Cli {
    /// Base url of the recipe API, e.g. http://localhost:5000
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Breakfast, Lunch or Dinner; omit for all
    #[arg(long)]
    meal_type: Option<MealType>,
    /// Comma separated: Vegetarian,Vegan,Gluten-Free,Keto
    #[arg(long, value_delimiter = ',')]
    dietary: Vec<DietaryTag>,
    /// Repeat for several ingredients
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    /// Free-text ingredient or dish search
    #[arg(long)]
    name: Option<String>,
}

impl FilterArgs {
    fn changes(&self) -> Vec<FilterChange> {
        let mut changes = vec![
            FilterChange::MealType(self.meal_type),
            FilterChange::Dietary(self.dietary.clone()),
        ];
        for ingredient in &self.ingredients {
            changes.push(FilterChange::IngredientDraft(ingredient.clone()));
            changes.push(FilterChange::AddIngredient);
        }
        if let Some(name) = &self.name {
            changes.push(FilterChange::IngredientDraft(name.clone()));
        }
        changes
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recipes matching the filters
    Recipes {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Manage the planned meal list
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Add a recipe from the filtered catalog
    Add {
        recipe_id: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Remove {
        planned_meal_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = api_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = MealPlannerClient::new(&settings)?;

    match cli.command {
        Command::Recipes { filters, json } => {
            load_catalog(&client, &filters).await?;
            let recipes = client.recipes().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            } else if recipes.is_empty() {
                println!("No recipes match these filters.");
            } else {
                for recipe in &recipes {
                    println!("{}\n", render_recipe_card(recipe));
                }
            }
        }
        Command::Plan { action } => match action {
            PlanCommand::Add { recipe_id, filters } => {
                load_catalog(&client, &filters).await?;
                let recipe = client
                    .add_to_planned_meal_by_id(&RecipeId(recipe_id))
                    .await?;
                info!(recipe_id = %recipe.id, "planned meal added from cli");
                println!("Added \"{}\" to the planned meal list.", recipe.display_title());
            }
            PlanCommand::List { json } => {
                client.load_planned_meals().await?;
                let planned = client.planned_meals().await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&planned)?);
                } else if planned.is_empty() {
                    println!("No planned meals yet.");
                } else {
                    for meal in &planned {
                        println!("{}\n", render_planned_card(meal));
                    }
                }
            }
            PlanCommand::Remove { planned_meal_id } => {
                let id = PlannedMealId(planned_meal_id);
                client.remove_planned_meal(&id).await?;
                info!(planned_meal_id = %id, "planned meal removed from cli");
                println!("Removed planned meal {id}.");
            }
        },
    }

    Ok(())
}

/// Stages every filter change and fetches only the final state.
async fn load_catalog(client: &MealPlannerClient, filters: &FilterArgs) -> Result<RefreshOutcome> {
    let mut latest = None;
    for change in filters.changes() {
        if let Some(ticket) = client.stage_filter_change(change).await {
            latest = Some(ticket);
        }
    }
    let ticket = match latest {
        Some(ticket) => ticket,
        None => client.stage_refresh().await,
    };
    debug!(generation = ticket.generation, query = ?ticket.query, "fetching catalog");
    client.execute_catalog(ticket).await
}

fn render_recipe_card(recipe: &Recipe) -> String {
    format!(
        "{}\n  id:     {}\n  image:  {}\n  recipe: {}",
        recipe.display_title(),
        recipe.id,
        recipe.image,
        recipe.recipe_link
    )
}

fn render_planned_card(meal: &PlannedMeal) -> String {
    format!(
        "{}\n  planned id: {}\n  recipe:     {}",
        meal.display_title(),
        meal.id,
        meal.recipe_link
    )
}
