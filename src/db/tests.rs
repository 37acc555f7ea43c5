//! Repository tests against an in-memory SQLite database.

use sea_orm::DatabaseConnection;
use serde_json::json;

use super::*;
use crate::models::{CreateColaborador, CreateGerente, CreatePaciente, CreateUnidade, Role, Section, UpdateUnidade};

async fn memory_db() -> DatabaseConnection {
    let conn = connect("sqlite::memory:").await.unwrap();
    ensure_schema(&conn).await.unwrap();
    conn
}

fn new_paciente(email: &str) -> CreatePaciente {
    CreatePaciente {
        nome: "Ana".to_string(),
        email: email.to_string(),
        password: "senhaforte".to_string(),
        geral: Some(json!({ "telefone": "11 1234" })),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_connection_helpers() {
    let conn = memory_db().await;
    test_connection(&conn).await.unwrap();
    assert!(get_version(&conn).await.unwrap().starts_with("SQLite"));

    let counts = get_table_counts(&conn).await.unwrap();
    assert_eq!(counts.unidades + counts.pacientes + counts.colaboradores + counts.gerentes, 0);

    // Schema creation is repeatable
    ensure_schema(&conn).await.unwrap();
}

#[tokio::test]
async fn test_unidade_crud() {
    let conn = memory_db().await;
    let created = unidade::create(
        &conn,
        CreateUnidade {
            nome: "Sede".to_string(),
            endereco: "Rua A".to_string(),
        },
    )
    .await
    .unwrap();

    let updated = unidade::update(
        &conn,
        created.id,
        UpdateUnidade {
            endereco: Some("Rua B".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.nome, "Sede");
    assert_eq!(updated.endereco, "Rua B");

    assert!(unidade::update(&conn, 999, UpdateUnidade::default()).await.unwrap().is_none());
    assert!(unidade::delete(&conn, created.id).await.unwrap());
    assert!(!unidade::delete(&conn, created.id).await.unwrap());
    assert!(unidade::list_all(&conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_paciente_password_is_hashed() {
    let conn = memory_db().await;
    let created = paciente::create(&conn, new_paciente("ana@example.com")).await.unwrap();

    assert_ne!(created.password_hash, "senhaforte");
    assert!(crate::auth::verify_password("senhaforte", &created.password_hash));

    let account = account::find_by_email(&conn, Role::Paciente, "ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.id, created.id);
    // Same e-mail under another role is a different account
    assert!(account::find_by_email(&conn, Role::Gerente, "ana@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_paciente_sections_and_analise() {
    let conn = memory_db().await;
    let created = paciente::create(&conn, new_paciente("bia@example.com")).await.unwrap();
    assert!(!created.analise);

    let updated = paciente::update_section(&conn, created.id, Section::Escola, json!({ "serie": "1º ano" }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.escola, Some(json!({ "serie": "1º ano" })));
    assert_eq!(updated.geral, created.geral);

    assert!(paciente::toggle_analise(&conn, created.id).await.unwrap().unwrap().analise);
    assert!(!paciente::toggle_analise(&conn, created.id).await.unwrap().unwrap().analise);
    assert!(paciente::toggle_analise(&conn, 999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_password_hash() {
    let conn = memory_db().await;
    let created = colaborador::create(
        &conn,
        CreateColaborador {
            nome: "Carla".to_string(),
            email: "carla@example.com".to_string(),
            password: "senhaforte".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let hash = crate::auth::hash_password("outrasenha").unwrap();
    assert!(account::set_password_hash(&conn, Role::Colaborador, created.id, hash).await.unwrap());

    let account = account::find_by_id(&conn, Role::Colaborador, created.id).await.unwrap().unwrap();
    assert!(crate::auth::verify_password("outrasenha", &account.password_hash));
}

#[tokio::test]
async fn test_gerente_set_unidade() {
    let conn = memory_db().await;
    let gerente = gerente::create(
        &conn,
        CreateGerente {
            nome: "Paula".to_string(),
            email: "paula@example.com".to_string(),
            password: "senhaforte".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(gerente.unidade_id, None);

    let sede = unidade::create(
        &conn,
        CreateUnidade {
            nome: "Sede".to_string(),
            endereco: "Rua A".to_string(),
        },
    )
    .await
    .unwrap();

    let linked = gerente::set_unidade(&conn, gerente.id, sede.id).await.unwrap().unwrap();
    assert_eq!(linked.unidade_id, Some(sede.id));
    assert!(gerente::set_unidade(&conn, 999, sede.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_token_single_use() {
    let conn = memory_db().await;
    let reset = password_reset::create(&conn, Role::Gerente, "paula@example.com").await.unwrap();
    assert_eq!(reset.token.len(), 32);

    assert!(password_reset::consume(&conn, Role::Paciente, &reset.token).await.unwrap().is_none());
    assert!(password_reset::consume(&conn, Role::Gerente, &reset.token).await.unwrap().is_some());
    assert!(password_reset::consume(&conn, Role::Gerente, &reset.token).await.unwrap().is_none());
}
