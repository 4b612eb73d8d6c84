use globelens_api::{
    auth::password::hash_password,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{Categories, ManagerAuths, categories, manager_auths},
    models::Role,
};
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use uuid::Uuid;

const CATEGORIES: [(&str, &str); 5] = [
    ("Healthcare", "Pharmaceuticals, medical devices and care delivery"),
    ("Technology", "Software, semiconductors and telecom"),
    ("Energy", "Oil and gas, renewables and utilities"),
    ("Consumer Goods", "Food, beverages and retail"),
    ("Automotive", "Vehicles, components and mobility"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let email = std::env::var("SEED_MANAGER_EMAIL").unwrap_or_else(|_| "manager@example.com".into());
    let password = std::env::var("SEED_MANAGER_PASSWORD").unwrap_or_else(|_| "manager123".into());
    ensure_manager(&orm, &email.to_lowercase(), &password).await?;
    seed_categories(&orm).await?;

    println!("Seed completed. Manager: {email}");
    Ok(())
}

/// Creates the manager account, or promotes an existing account with that email.
async fn ensure_manager(orm: &DatabaseConnection, email: &str, password: &str) -> anyhow::Result<()> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let active = manager_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Site".to_string()),
        last_name: Set("Manager".to_string()),
        phone: Set(String::new()),
        role: Set(Role::Manager.as_str().to_string()),
        ..Default::default()
    };
    ManagerAuths::insert(active)
        .on_conflict(
            OnConflict::column(manager_auths::Column::Email)
                .update_column(manager_auths::Column::Role)
                .to_owned(),
        )
        .exec_without_returning(orm)
        .await?;

    println!("Ensured manager account");
    Ok(())
}

async fn seed_categories(orm: &DatabaseConnection) -> anyhow::Result<()> {
    for (name, description) in CATEGORIES {
        let active = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            ..Default::default()
        };
        Categories::insert(active)
            .on_conflict(
                OnConflict::column(categories::Column::CategoryName)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(orm)
            .await?;
    }

    println!("Seeded categories");
    Ok(())
}
