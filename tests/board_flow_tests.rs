//! End-to-end board flows through the MCP tool handlers

mod common;

use common::{extract_id_from_response, test_board, test_handler};
use kanban_mcp::BoardServerHandler;
use kanban_mcp::store::FileStore;
use std::sync::Arc;

#[tokio::test]
async fn test_add_task_requires_existing_list() {
    let (handler, _store) = test_handler();
    let result = handler
        .handle_add_task(
            "no-such-list".to_string(),
            "backlog".to_string(),
            "Orphan".to_string(),
            None,
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_add_task_rejects_unknown_column() {
    let (handler, _store, list_id) = test_board().await;
    let result = handler
        .handle_add_task(list_id, "doing".to_string(), "Task".to_string(), None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_add_task_rejects_empty_title() {
    let (handler, _store, list_id) = test_board().await;
    let result = handler
        .handle_add_task(list_id, "backlog".to_string(), "   ".to_string(), None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_unknown_task_fails() {
    let (handler, _store, list_id) = test_board().await;
    let result = handler
        .handle_delete_task(list_id, "no-such-task".to_string())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_task_with_wrong_list_fails() {
    let (handler, _store, list_id) = test_board().await;
    let response = handler
        .handle_add_task(
            list_id,
            "backlog".to_string(),
            "Task".to_string(),
            None,
        )
        .await
        .unwrap();
    let task_id = extract_id_from_response(&response);

    let result = handler
        .handle_delete_task("other-list".to_string(), task_id)
        .await;
    assert!(result.is_err());
}

/// The canonical flow: three tasks, a move to top, a delete, and a board
/// render that reflects both
#[tokio::test]
async fn test_move_to_top_then_delete_renumbers_the_column() {
    let (handler, _store, list_id) = test_board().await;

    // add_task inserts at the top, so create in reverse display order.
    // Lowercase titles cannot collide with ULID substrings in assertions.
    let mut ids = Vec::new();
    for title in ["gamma", "beta", "alpha"] {
        let response = handler
            .handle_add_task(
                list_id.clone(),
                "backlog".to_string(),
                title.to_string(),
                None,
            )
            .await
            .unwrap();
        ids.push(extract_id_from_response(&response));
    }
    let (gamma, beta, alpha) = (ids[0].clone(), ids[1].clone(), ids[2].clone());

    // [alpha:0, beta:1, gamma:2] -> promote gamma to the top
    let response = handler
        .handle_move_task_to_rank(gamma.clone(), "top".to_string())
        .await
        .unwrap();
    assert_eq!(response, format!("Task {} moved (top)", gamma));

    let board = handler.handle_show_board(list_id.clone()).await.unwrap();
    let gamma_at = board.find("gamma").unwrap();
    let alpha_at = board.find("alpha").unwrap();
    let beta_at = board.find("beta").unwrap();
    assert!(gamma_at < alpha_at && alpha_at < beta_at);

    // Delete the middle task; the survivors renumber to 0 and 1
    handler
        .handle_delete_task(list_id.clone(), alpha)
        .await
        .unwrap();

    let board = handler.handle_show_board(list_id).await.unwrap();
    assert!(board.contains(&format!("  0. [{}] gamma", gamma)));
    assert!(board.contains(&format!("  1. [{}] beta", beta)));
    assert!(!board.contains("alpha"));
}

#[tokio::test]
async fn test_move_task_between_columns_shows_in_board() {
    let (handler, _store, list_id) = test_board().await;
    let response = handler
        .handle_add_task(
            list_id.clone(),
            "backlog".to_string(),
            "Ship it".to_string(),
            None,
        )
        .await
        .unwrap();
    let task_id = extract_id_from_response(&response);

    handler
        .handle_move_task(list_id.clone(), task_id.clone(), "at_work".to_string())
        .await
        .unwrap();

    let board = handler.handle_show_board(list_id).await.unwrap();
    assert!(board.contains("backlog (0 task(s))"));
    assert!(board.contains("at_work (1 task(s))"));
    assert!(board.contains(&format!("  0. [{}] Ship it", task_id)));
}

#[tokio::test]
async fn test_move_task_rejects_bad_rank_target() {
    let (handler, _store, list_id) = test_board().await;
    let response = handler
        .handle_add_task(
            list_id,
            "backlog".to_string(),
            "Task".to_string(),
            None,
        )
        .await
        .unwrap();
    let task_id = extract_id_from_response(&response);

    let result = handler
        .handle_move_task_to_rank(task_id, "sideways".to_string())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_reorder_across_columns_is_refused() {
    let (handler, _store, list_id) = test_board().await;
    let a = extract_id_from_response(
        &handler
            .handle_add_task(
                list_id.clone(),
                "backlog".to_string(),
                "A".to_string(),
                None,
            )
            .await
            .unwrap(),
    );
    let b = extract_id_from_response(
        &handler
            .handle_add_task(
                list_id,
                "at_work".to_string(),
                "B".to_string(),
                None,
            )
            .await
            .unwrap(),
    );

    let result = handler.handle_reorder_tasks(a, b).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_task_edits_and_clears_details() {
    let (handler, _store, list_id) = test_board().await;
    let task_id = extract_id_from_response(
        &handler
            .handle_add_task(
                list_id.clone(),
                "backlog".to_string(),
                "Draft".to_string(),
                Some("rough notes".to_string()),
            )
            .await
            .unwrap(),
    );

    // Details marker shows while details are present
    let board = handler.handle_show_board(list_id.clone()).await.unwrap();
    assert!(board.contains("Draft *"));

    handler
        .handle_update_task(
            task_id.clone(),
            Some("Final".to_string()),
            Some(String::new()),
            None,
        )
        .await
        .unwrap();

    let board = handler.handle_show_board(list_id).await.unwrap();
    assert!(board.contains("Final"));
    assert!(!board.contains("Draft"));
    assert!(!board.contains("Final *"));
}

#[tokio::test]
async fn test_list_crud_and_delete_guard() {
    let (handler, _store) = test_handler();

    let list_id = extract_id_from_response(
        &handler
            .handle_add_list("Inbox".to_string(), Some("#00ff00".to_string()))
            .await
            .unwrap(),
    );
    assert!(handler.handle_list_lists().await.unwrap().contains("Inbox"));

    handler
        .handle_update_list(list_id.clone(), Some("Triage".to_string()), None)
        .await
        .unwrap();
    let listing = handler.handle_list_lists().await.unwrap();
    assert!(listing.contains("Triage"));
    assert!(!listing.contains("Inbox"));

    // A non-empty list cannot be deleted
    let task_id = extract_id_from_response(
        &handler
            .handle_add_task(
                list_id.clone(),
                "backlog".to_string(),
                "Blocker".to_string(),
                None,
            )
            .await
            .unwrap(),
    );
    assert!(handler.handle_delete_list(list_id.clone()).await.is_err());

    handler
        .handle_delete_task(list_id.clone(), task_id)
        .await
        .unwrap();
    handler.handle_delete_list(list_id).await.unwrap();
    assert_eq!(handler.handle_list_lists().await.unwrap(), "No lists found");
}

#[tokio::test]
async fn test_file_store_survives_handler_restart() {
    let dir = tempfile::tempdir().unwrap();

    let list_id;
    {
        let handler = BoardServerHandler::new(Arc::new(FileStore::new(dir.path())));
        list_id = extract_id_from_response(
            &handler
                .handle_add_list("Persistent".to_string(), None)
                .await
                .unwrap(),
        );
        handler
            .handle_add_task(
                list_id.clone(),
                "backlog".to_string(),
                "Survives".to_string(),
                None,
            )
            .await
            .unwrap();
    }

    // A fresh handler over the same directory sees the same board
    let handler = BoardServerHandler::new(Arc::new(FileStore::new(dir.path())));
    let board = handler.handle_show_board(list_id).await.unwrap();
    assert!(board.contains("Persistent"));
    assert!(board.contains("Survives"));
}
