use hrgate_application::RoleInheritanceRepository;
use hrgate_core::AppError;
use hrgate_domain::{InheritancePriority, Role, RoleInheritance};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresRoleInheritanceRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role inheritance tests: {error}");
    }

    Some(pool)
}

async fn clear_pair(pool: &PgPool, child_role: Role, parent_role: Role) {
    let delete =
        sqlx::query("DELETE FROM role_inheritance WHERE child_role = $1 AND parent_role = $2")
            .bind(child_role.as_str())
            .bind(parent_role.as_str())
            .execute(pool)
            .await;

    assert!(delete.is_ok());
}

fn edge(child_role: Role, parent_role: Role) -> RoleInheritance {
    match RoleInheritance::new(
        child_role,
        parent_role,
        InheritancePriority::default(),
        Some("postgres adapter test edge".to_owned()),
    ) {
        Ok(edge) => edge,
        Err(error) => panic!("edge should be valid: {error}"),
    }
}

#[tokio::test]
async fn partial_unique_index_only_guards_active_pairs() {
    let Some(pool) = test_pool().await else {
        return;
    };

    clear_pair(&pool, Role::Supervisor, Role::Payroll).await;
    let repository = PostgresRoleInheritanceRepository::new(pool.clone());

    let Ok(mut first) = repository
        .insert_inheritance(edge(Role::Supervisor, Role::Payroll))
        .await
    else {
        panic!("first edge should be inserted");
    };

    let duplicate = repository
        .insert_inheritance(edge(Role::Supervisor, Role::Payroll))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    first.set_active(false);
    assert!(repository.save_inheritance(first.clone()).await.is_ok());
    assert!(
        repository
            .insert_inheritance(edge(Role::Supervisor, Role::Payroll))
            .await
            .is_ok()
    );

    first.set_active(true);
    let reactivated = repository.save_inheritance(first.clone()).await;
    assert!(matches!(reactivated, Err(AppError::Conflict(_))));

    let found = repository.find_inheritance(first.id()).await;
    let Ok(Some(found)) = found else {
        panic!("edge should be found");
    };
    assert!(!found.is_active());
    assert_eq!(found.notes(), Some("postgres adapter test edge"));

    clear_pair(&pool, Role::Supervisor, Role::Payroll).await;
}

#[tokio::test]
async fn self_edges_are_rejected_by_the_table() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let insert = sqlx::query(
        r#"
        INSERT INTO role_inheritance (id, child_role, parent_role)
        VALUES ($1, 'hr', 'hr')
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .execute(&pool)
    .await;

    assert!(insert.is_err());
}
