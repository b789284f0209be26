//! GraphQL schema definition with queries and mutations
//!
//! The store handle is injected as schema data; resolvers read it from the
//! context instead of any global state.

use async_graphql::dataloader::DataLoader;
use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::{Database, DirectorRecord, MovieRecord};

use super::loaders::RelationLoader;
use super::mutations::{DirectorMutations, MovieMutations};
use super::queries::{DirectorQueries, MovieQueries};

/// The GraphQL schema type
pub type CinemaSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
#[graphql(name = "RootQueryType")]
pub struct QueryRoot(MovieQueries, DirectorQueries);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutations")]
pub struct MutationRoot(DirectorMutations, MovieMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database) -> CinemaSchema {
    let directors_by_id = DataLoader::new(
        RelationLoader::<DirectorRecord>::new(db.clone(), "id"),
        tokio::spawn,
    );
    let movies_by_director = DataLoader::new(
        RelationLoader::<MovieRecord>::new(db.clone(), "director_id"),
        tokio::spawn,
    );

    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .extension(Tracing)
    .data(directors_by_id)
    .data(movies_by_director)
    .data(db)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Request, Response, Variables};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    const ADD_DIRECTOR: &str = r#"
        mutation AddDirector($name: String!, $age: Int!) {
            addDirector(name: $name, age: $age) { id name age }
        }
    "#;

    const ADD_MOVIE: &str = r#"
        mutation AddMovie($name: String!, $genre: String!, $directorId: ID!) {
            addMovie(name: $name, genre: $genre, directorId: $directorId) {
                id name genre directorId
            }
        }
    "#;

    async fn setup() -> (CinemaSchema, Database) {
        let db = Database::in_memory().await.unwrap();
        let sync = db.sync_schema().await;
        assert!(sync.errors.is_empty(), "{:?}", sync.errors);
        (build_schema(db.clone()), db)
    }

    async fn execute(schema: &CinemaSchema, query: &str, variables: Value) -> Response {
        schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await
    }

    async fn run(schema: &CinemaSchema, query: &str, variables: Value) -> Value {
        let response = execute(schema, query, variables).await;
        assert!(
            response.errors.is_empty(),
            "unexpected errors: {:?}",
            response.errors
        );
        response.data.into_json().unwrap()
    }

    async fn add_director(schema: &CinemaSchema, name: &str, age: i32) -> String {
        let data = run(schema, ADD_DIRECTOR, json!({ "name": name, "age": age })).await;
        data["addDirector"]["id"].as_str().unwrap().to_string()
    }

    async fn add_movie(schema: &CinemaSchema, name: &str, genre: &str, director_id: &str) -> String {
        let data = run(
            schema,
            ADD_MOVIE,
            json!({ "name": name, "genre": genre, "directorId": director_id }),
        )
        .await;
        data["addMovie"]["id"].as_str().unwrap().to_string()
    }

    fn error_codes(response: &Response) -> Vec<Value> {
        serde_json::to_value(&response.errors)
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["extensions"]["code"].clone())
            .collect()
    }

    #[tokio::test]
    async fn test_add_director_returns_inputs_with_unique_id() {
        let (schema, _db) = setup().await;

        let first = run(&schema, ADD_DIRECTOR, json!({ "name": "Lana Wachowski", "age": 58 })).await;
        let second = run(&schema, ADD_DIRECTOR, json!({ "name": "Lana Wachowski", "age": 58 })).await;

        let first = &first["addDirector"];
        assert_eq!(first["name"], "Lana Wachowski");
        assert_eq!(first["age"], 58);
        assert!(!first["id"].as_str().unwrap().is_empty());
        assert_ne!(first["id"], second["addDirector"]["id"]);
    }

    #[tokio::test]
    async fn test_unknown_or_missing_ids_resolve_to_null() {
        let (schema, _db) = setup().await;

        let data = run(
            &schema,
            r#"{
                byUnknown: movie(id: "does-not-exist") { id }
                byNothing: movie { id }
                director(id: "does-not-exist") { id }
            }"#,
            json!({}),
        )
        .await;

        assert_eq!(
            data,
            json!({ "byUnknown": null, "byNothing": null, "director": null })
        );
    }

    #[tokio::test]
    async fn test_add_movie_then_fetch() {
        let (schema, _db) = setup().await;
        let movie_id = add_movie(&schema, "Alien", "Horror", "some-director").await;

        let data = run(
            &schema,
            "query Movie($id: ID) { movie(id: $id) { id name genre directorId } }",
            json!({ "id": movie_id }),
        )
        .await;

        assert_eq!(
            data["movie"],
            json!({
                "id": movie_id,
                "name": "Alien",
                "genre": "Horror",
                "directorId": "some-director",
            })
        );
    }

    #[tokio::test]
    async fn test_relationship_resolves_both_ways() {
        let (schema, _db) = setup().await;
        let director_id = add_director(&schema, "Ridley Scott", 87).await;
        let alien = add_movie(&schema, "Alien", "Horror", &director_id).await;
        let blade_runner = add_movie(&schema, "Blade Runner", "Sci-Fi", &director_id).await;
        add_movie(&schema, "Heat", "Crime", "someone-else").await;

        let data = run(
            &schema,
            r#"query Both($director: ID, $movie: ID) {
                director(id: $director) { movies { id } }
                movie(id: $movie) { director { id name } }
            }"#,
            json!({ "director": director_id, "movie": alien }),
        )
        .await;

        assert_eq!(
            data["director"]["movies"],
            json!([{ "id": alien }, { "id": blade_runner }])
        );
        assert_eq!(data["movie"]["director"]["id"], json!(director_id));
        assert_eq!(data["movie"]["director"]["name"], "Ridley Scott");
    }

    #[tokio::test]
    async fn test_director_without_movies_has_empty_list() {
        let (schema, _db) = setup().await;
        let director_id = add_director(&schema, "Nobody Yet", 30).await;

        let data = run(
            &schema,
            "query D($id: ID) { director(id: $id) { movies { id } } }",
            json!({ "id": director_id }),
        )
        .await;

        assert_eq!(data["director"]["movies"], json!([]));
    }

    #[tokio::test]
    async fn test_deleting_director_leaves_dangling_movies() {
        let (schema, _db) = setup().await;
        let director_id = add_director(&schema, "Lana Wachowski", 58).await;
        let movie_id = add_movie(&schema, "The Matrix", "Sci-Fi", &director_id).await;

        let deleted = run(
            &schema,
            "mutation D($id: ID!) { deleteDirector(id: $id) { acknowledged deletedCount id } }",
            json!({ "id": director_id }),
        )
        .await;
        assert_eq!(
            deleted["deleteDirector"],
            json!({ "acknowledged": true, "deletedCount": 1, "id": director_id })
        );

        let data = run(
            &schema,
            "query M($id: ID) { movie(id: $id) { name genre directorId director { id } } }",
            json!({ "id": movie_id }),
        )
        .await;
        assert_eq!(
            data["movie"],
            json!({
                "name": "The Matrix",
                "genre": "Sci-Fi",
                "directorId": director_id,
                "director": null,
            })
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_movie_is_a_noop() {
        let (schema, _db) = setup().await;
        let movie_id = add_movie(&schema, "Heat", "Crime", "d1").await;

        let data = run(
            &schema,
            r#"mutation { deleteMovie(id: "missing") { acknowledged deletedCount id } }"#,
            json!({}),
        )
        .await;
        assert_eq!(
            data["deleteMovie"],
            json!({ "acknowledged": true, "deletedCount": 0, "id": "missing" })
        );

        let data = run(&schema, "{ movieCollection { id } }", json!({})).await;
        assert_eq!(data["movieCollection"], json!([{ "id": movie_id }]));
    }

    #[tokio::test]
    async fn test_matrix_scenario() {
        let (schema, _db) = setup().await;

        let added = run(
            &schema,
            r#"mutation { addDirector(name: "Lana Wachowski", age: 58) { id name age } }"#,
            json!({}),
        )
        .await;
        let d1 = added["addDirector"]["id"].as_str().unwrap().to_string();
        assert_eq!(
            added["addDirector"],
            json!({ "id": d1, "name": "Lana Wachowski", "age": 58 })
        );

        let m1 = add_movie(&schema, "The Matrix", "Sci-Fi", &d1).await;

        let data = run(
            &schema,
            r#"query All($d1: ID) {
                movieCollection { id name }
                directorCollection { id name }
                director(id: $d1) { movies { id name genre } }
            }"#,
            json!({ "d1": d1 }),
        )
        .await;

        assert_eq!(
            data,
            json!({
                "movieCollection": [{ "id": m1, "name": "The Matrix" }],
                "directorCollection": [{ "id": d1, "name": "Lana Wachowski" }],
                "director": {
                    "movies": [{ "id": m1, "name": "The Matrix", "genre": "Sci-Fi" }]
                },
            })
        );
    }

    #[tokio::test]
    async fn test_nested_directors_across_collection() {
        let (schema, _db) = setup().await;
        let lana = add_director(&schema, "Lana Wachowski", 58).await;
        let ridley = add_director(&schema, "Ridley Scott", 87).await;
        add_movie(&schema, "The Matrix", "Sci-Fi", &lana).await;
        add_movie(&schema, "Alien", "Horror", &ridley).await;
        add_movie(&schema, "Cloud Atlas", "Drama", &lana).await;
        add_movie(&schema, "Orphan", "Drama", "dangling").await;

        let data = run(
            &schema,
            "{ movieCollection { name director { name } } }",
            json!({}),
        )
        .await;

        assert_eq!(
            data["movieCollection"],
            json!([
                { "name": "The Matrix", "director": { "name": "Lana Wachowski" } },
                { "name": "Alien", "director": { "name": "Ridley Scott" } },
                { "name": "Cloud Atlas", "director": { "name": "Lana Wachowski" } },
                { "name": "Orphan", "director": null },
            ])
        );
    }

    #[tokio::test]
    async fn test_edit_director_returns_updated_record() {
        let (schema, _db) = setup().await;
        let id = add_director(&schema, "Lana Wachowski", 58).await;

        let data = run(
            &schema,
            r#"mutation E($id: ID!) {
                editDirector(id: $id, name: "Lilly Wachowski", age: 56) { id name age }
            }"#,
            json!({ "id": id }),
        )
        .await;
        assert_eq!(
            data["editDirector"],
            json!({ "id": id, "name": "Lilly Wachowski", "age": 56 })
        );

        let data = run(
            &schema,
            r#"mutation { editDirector(id: "missing", name: "x", age: 1) { id } }"#,
            json!({}),
        )
        .await;
        assert_eq!(data["editDirector"], Value::Null);

        let data = run(&schema, "{ directorCollection { name } }", json!({})).await;
        assert_eq!(data["directorCollection"], json!([{ "name": "Lilly Wachowski" }]));
    }

    #[tokio::test]
    async fn test_edit_movie_replaces_all_fields() {
        let (schema, _db) = setup().await;
        let first = add_director(&schema, "Lana Wachowski", 58).await;
        let second = add_director(&schema, "Lilly Wachowski", 56).await;
        let movie_id = add_movie(&schema, "The Matrix", "Sci-Fi", &first).await;

        let data = run(
            &schema,
            r#"mutation E($id: ID!, $directorId: ID!) {
                editMovie(id: $id, name: "The Matrix Reloaded", genre: "Action", directorId: $directorId) {
                    id name genre director { name }
                }
            }"#,
            json!({ "id": movie_id, "directorId": second }),
        )
        .await;

        assert_eq!(
            data["editMovie"],
            json!({
                "id": movie_id,
                "name": "The Matrix Reloaded",
                "genre": "Action",
                "director": { "name": "Lilly Wachowski" },
            })
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_movie_returns_null_and_writes_nothing() {
        let (schema, _db) = setup().await;
        add_movie(&schema, "The Matrix", "Sci-Fi", "d1").await;

        let data = run(
            &schema,
            r#"mutation {
                editMovie(id: "missing", name: "Alien", genre: "Horror", directorId: "d2") { id }
            }"#,
            json!({}),
        )
        .await;
        assert_eq!(data["editMovie"], Value::Null);

        let data = run(
            &schema,
            "{ movieCollection { name genre directorId } }",
            json!({}),
        )
        .await;
        assert_eq!(
            data["movieCollection"],
            json!([{ "name": "The Matrix", "genre": "Sci-Fi", "directorId": "d1" }])
        );
    }

    #[tokio::test]
    async fn test_edit_movie_rejects_integer_genre() {
        let (schema, _db) = setup().await;
        let movie_id = add_movie(&schema, "The Matrix", "Sci-Fi", "d1").await;

        let response = execute(
            &schema,
            r#"mutation E($id: ID!) {
                editMovie(id: $id, name: "The Matrix", genre: 42, directorId: "d1") { id }
            }"#,
            json!({ "id": movie_id }),
        )
        .await;
        assert!(!response.errors.is_empty());

        let data = run(
            &schema,
            "query M($id: ID) { movie(id: $id) { genre } }",
            json!({ "id": movie_id }),
        )
        .await;
        assert_eq!(data["movie"]["genre"], "Sci-Fi");
    }

    #[tokio::test]
    async fn test_missing_required_argument_writes_nothing() {
        let (schema, _db) = setup().await;

        let response = execute(
            &schema,
            r#"mutation { addDirector(name: "No Age") { id } }"#,
            json!({}),
        )
        .await;
        assert!(!response.errors.is_empty());

        let data = run(&schema, "{ directorCollection { id } }", json!({})).await;
        assert_eq!(data["directorCollection"], json!([]));
    }

    #[tokio::test]
    async fn test_store_failure_is_scoped_to_the_failing_field() {
        let (schema, db) = setup().await;
        let movie_id = add_movie(&schema, "The Matrix", "Sci-Fi", "d1").await;
        sqlx::query("DROP TABLE directors")
            .execute(db.pool())
            .await
            .unwrap();

        let response = execute(
            &schema,
            r#"query Q($id: ID) {
                movie(id: $id) { name }
                movieCollection { name director { name } }
                directorCollection { id }
            }"#,
            json!({ "id": movie_id }),
        )
        .await;

        assert_eq!(
            error_codes(&response),
            vec![json!("STORE_ERROR"), json!("STORE_ERROR")]
        );
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "movie": { "name": "The Matrix" },
                "movieCollection": [{ "name": "The Matrix", "director": null }],
                "directorCollection": null,
            })
        );
    }

    #[tokio::test]
    async fn test_failed_store_field_keeps_its_key_and_path() {
        let (schema, db) = setup().await;
        sqlx::query("DROP TABLE movies")
            .execute(db.pool())
            .await
            .unwrap();

        let response = execute(
            &schema,
            r#"mutation {
                addDirector(name: "Agnès Varda", age: 90) { name movies { name } }
                addMovie(name: "Cléo from 5 to 7", genre: "Drama", directorId: "d1") { id }
            }"#,
            json!({}),
        )
        .await;

        assert_eq!(
            error_codes(&response),
            vec![json!("STORE_ERROR"), json!("STORE_ERROR")]
        );
        let errors = serde_json::to_value(&response.errors).unwrap();
        assert_eq!(errors[0]["path"], json!(["addDirector", "movies"]));
        assert_eq!(errors[1]["path"], json!(["addMovie"]));
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "addDirector": { "name": "Agnès Varda", "movies": null },
                "addMovie": null,
            })
        );
    }

    #[test]
    fn test_schema_type_names() {
        let sdl = CinemaSchema::build(
            QueryRoot::default(),
            MutationRoot::default(),
            EmptySubscription,
        )
        .finish()
        .sdl();

        assert!(sdl.contains("type RootQueryType"));
        assert!(sdl.contains("type Mutations"));
        assert!(sdl.contains("type DeleteMovieResult"));
        assert!(sdl.contains("type DeleteDirectorResult"));
    }
}
