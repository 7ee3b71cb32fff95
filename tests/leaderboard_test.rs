mod common;

use common::*;

#[tokio::test]
async fn leaderboard_rewards_speed_and_lists_wrong_answers_last() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let (owner_token, _) = auth(&client, &base, "owner", "owner@example.com").await;
    let (quiz_id, _code) = create_quiz(&client, &base, &owner_token, "Capitals").await;
    let question_id = add_question(&client, &base, &owner_token, &quiz_id, 1000).await;

    let (p1_token, p1_id) = auth(&client, &base, "p1", "p1@example.com").await;
    let (p2_token, p2_id) = auth(&client, &base, "p2", "p2@example.com").await;
    let (p3_token, p3_id) = auth(&client, &base, "p3", "p3@example.com").await;
    let (p4_token, p4_id) = auth(&client, &base, "p4", "p4@example.com").await;

    for (token, answer) in [
        (&p1_token, "Paris"),
        (&p2_token, "Paris"),
        (&p3_token, "Paris"),
        (&p4_token, "London"),
    ] {
        let resp = submit_answer(&client, &base, token, &quiz_id, &question_id, answer).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let entries = get_leaderboard(&client, &base, &p1_token, &quiz_id).await;
    assert_eq!(entries.len(), 4, "all four submitters should be listed");

    assert_eq!(entries[0]["user_id"], p1_id.as_str());
    assert_eq!(entries[0]["score"], 1000.0);
    assert_eq!(entries[0]["rank"], 1);

    assert_eq!(entries[1]["user_id"], p2_id.as_str());
    assert_eq!(entries[1]["score"], 900.0);
    assert_eq!(entries[1]["rank"], 2);

    assert_eq!(entries[2]["user_id"], p3_id.as_str());
    assert_eq!(entries[2]["score"], 810.0);
    assert_eq!(entries[2]["rank"], 3);

    assert_eq!(entries[3]["user_id"], p4_id.as_str());
    assert_eq!(entries[3]["score"], 0.0);
    assert_eq!(entries[3]["rank"], 4);
}

#[tokio::test]
async fn sole_incorrect_submitter_holds_rank_one_with_zero_score() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let (owner_token, _) = auth(&client, &base, "solo_owner", "solo_owner@example.com").await;
    let (quiz_id, _code) = create_quiz(&client, &base, &owner_token, "Lonely").await;
    let question_id = add_question(&client, &base, &owner_token, &quiz_id, 100).await;

    let (token, user_id) = auth(&client, &base, "solo", "solo@example.com").await;
    let resp = submit_answer(&client, &base, &token, &quiz_id, &question_id, "London").await;
    assert_eq!(resp.status().as_u16(), 201);

    let entries = get_leaderboard(&client, &base, &token, &quiz_id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_id"], user_id.as_str());
    assert_eq!(entries[0]["score"], 0.0);
    assert_eq!(entries[0]["rank"], 1);
}

#[tokio::test]
async fn join_codes_are_six_digits_and_resolvable() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let (token, _) = auth(&client, &base, "codes", "codes@example.com").await;
    let (first_id, first_code) = create_quiz(&client, &base, &token, "First").await;
    let (_second_id, second_code) = create_quiz(&client, &base, &token, "Second").await;

    for code in [&first_code, &second_code] {
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()), "bad code {code}");
    }
    assert_ne!(first_code, second_code, "two quizzes must not share a code");

    let resp = client
        .post(format!("{base}/api/v1/quizzes/join"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "code": first_code }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["id"], first_id.as_str());

    // A malformed code never reaches the lookup.
    let resp = client
        .post(format!("{base}/api/v1/quizzes/join"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "code": "12ab56" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn quiz_is_returned_with_its_questions() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let (token, _) = auth(&client, &base, "reader", "reader@example.com").await;
    let (quiz_id, _code) = create_quiz(&client, &base, &token, "Readable").await;
    add_question(&client, &base, &token, &quiz_id, 100).await;
    add_question(&client, &base, &token, &quiz_id, 100).await;

    let resp = client
        .get(format!("{base}/api/v1/quizzes/{quiz_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["questions"].as_array().unwrap().len(), 2);
}
