#[cfg(test)]
mod tests {

    use movie_catalog::error::StorageError;
    use movie_catalog::movie::{Catalog, Movie};
    use movie_catalog::storage::{open_storage, Backend, MovieStorage};
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        let mut movies = Catalog::new();
        movies.insert(
            "Pulp Fiction".to_string(),
            Movie::new(1994, 8.8, "https://example.com/pulp.jpg"),
        );
        movies.insert("The Room".to_string(), Movie::new(2003, 3.6, "N/A"));
        movies.insert(
            "Star Wars: Episode V, \"Empire\"".to_string(),
            Movie::new(1980, 8.7, "N/A"),
        );
        movies
    }

    fn both_backends(dir: &TempDir) -> Vec<Box<dyn MovieStorage>> {
        vec![
            open_storage(dir.path().join("data/movies.json"), Backend::Json),
            open_storage(dir.path().join("data/movies.csv"), Backend::Csv),
        ]
    }

    fn seeded(dir: &TempDir) -> Vec<Box<dyn MovieStorage>> {
        let storages = both_backends(dir);
        for storage in &storages {
            storage.save(&sample()).unwrap();
        }
        storages
    }

    #[test]
    fn round_trip_preserves_catalog() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            assert_eq!(storage.list_movies().unwrap(), sample());
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        for storage in both_backends(&dir) {
            match storage.list_movies() {
                Err(StorageError::Missing(path)) => assert_eq!(path, storage.path()),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn create_empty_makes_loadable_file() {
        let dir = TempDir::new().unwrap();
        for storage in both_backends(&dir) {
            storage.create_empty().unwrap();
            assert!(storage.path().exists());
            assert!(storage.list_movies().unwrap().is_empty());
        }
    }

    #[test]
    fn adding_existing_title_is_rejected_without_writing() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            let before = fs::read(storage.path()).unwrap();
            let res = storage.add_new_movie("The Room", Movie::new(2020, 10.0, "N/A"));
            assert!(matches!(res, Err(StorageError::Duplicate(ref t)) if t == "The Room"));
            assert_eq!(fs::read(storage.path()).unwrap(), before);
        }
    }

    #[test]
    fn add_new_movie_persists() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            storage
                .add_new_movie("Heat", Movie::new(1995, 8.3, "N/A"))
                .unwrap();
            let movies = storage.list_movies().unwrap();
            assert_eq!(movies.len(), 4);
            assert_eq!(movies["Heat"], Movie::new(1995, 8.3, "N/A"));
        }
    }

    #[test]
    fn add_movie_overwrites() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            storage
                .add_movie("The Room", Movie::new(2003, 4.0, "N/A"))
                .unwrap();
            assert_eq!(storage.list_movies().unwrap()["The Room"].rating, 4.0);
        }
    }

    #[test]
    fn deleting_absent_title_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            let before = fs::read(storage.path()).unwrap();
            let res = storage.delete_movie("Heat");
            assert!(matches!(res, Err(StorageError::NotFound(_))));
            assert_eq!(res.unwrap_err().to_string(), "Movie 'Heat' doesn't exist!");
            assert_eq!(fs::read(storage.path()).unwrap(), before);
        }
    }

    #[test]
    fn delete_removes_only_that_title() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            let removed = storage.delete_movie("The Room").unwrap();
            assert_eq!(removed.year, 2003);
            let movies = storage.list_movies().unwrap();
            assert!(!movies.contains_key("The Room"));
            assert_eq!(movies.len(), 2);
        }
    }

    #[test]
    fn update_changes_rating_only() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            storage.update_movie("Pulp Fiction", 9.1).unwrap();
            let movies = storage.list_movies().unwrap();
            assert_eq!(
                movies["Pulp Fiction"],
                Movie::new(1994, 9.1, "https://example.com/pulp.jpg")
            );
            assert_eq!(movies["The Room"], sample()["The Room"]);
        }
    }

    #[test]
    fn update_absent_title_fails() {
        let dir = TempDir::new().unwrap();
        for storage in seeded(&dir) {
            assert!(matches!(
                storage.update_movie("Heat", 5.0),
                Err(StorageError::NotFound(_))
            ));
        }
    }

    #[test]
    fn json_layout_is_title_keyed_object() {
        let dir = TempDir::new().unwrap();
        let storage = open_storage(dir.path().join("movies.json"), Backend::Json);
        storage.save(&sample()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(value["The Room"]["year"], 2003);
        assert_eq!(value["The Room"]["poster"], "N/A");
    }

    #[test]
    fn json_reads_legacy_string_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(
            &path,
            r#"{"Inception": {"year": "2010", "rating": "8.8", "poster": "N/A"}}"#,
        )
        .unwrap();
        let movies = open_storage(&path, Backend::Json).list_movies().unwrap();
        assert_eq!(movies["Inception"], Movie::new(2010, 8.8, "N/A"));
    }

    #[test]
    fn json_tolerates_unparsable_legacy_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(
            &path,
            r#"{"Heat": {"year": "1995", "rating": "8.3", "poster": "N/A"},
                "Obscure": {"year": "2021", "rating": "N/A", "poster": "N/A"},
                "Sherlock": {"year": "2010–2017", "rating": "9.1", "poster": "N/A"}}"#,
        )
        .unwrap();
        let storage = open_storage(&path, Backend::Json);
        let movies = storage.list_movies().unwrap();
        assert_eq!(movies["Heat"], Movie::new(1995, 8.3, "N/A"));
        assert_eq!(movies["Obscure"], Movie::new(2021, 0.0, "N/A"));
        assert_eq!(movies["Sherlock"].year, 2010);

        // the odd entry can be removed through the normal operations
        storage.delete_movie("Obscure").unwrap();
        assert_eq!(storage.list_movies().unwrap().len(), 2);
    }

    #[test]
    fn file_order_is_kept_across_saves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(
            &path,
            r#"{"Zodiac": {"year": 2007, "rating": 7.7, "poster": "N/A"},
                "Alien": {"year": 1979, "rating": 8.5, "poster": "N/A"},
                "Memento": {"year": 2000, "rating": 8.4, "poster": "N/A"}}"#,
        )
        .unwrap();
        let storage = open_storage(&path, Backend::Json);
        storage.delete_movie("Alien").unwrap();
        storage
            .add_new_movie("Heat", Movie::new(1995, 8.3, "N/A"))
            .unwrap();
        let titles: Vec<String> = storage.list_movies().unwrap().keys().cloned().collect();
        assert_eq!(titles, vec!["Zodiac", "Memento", "Heat"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(&path, "{not json").unwrap();
        let res = open_storage(&path, Backend::Json).list_movies();
        assert!(matches!(res, Err(StorageError::Json { .. })));
    }

    #[test]
    fn csv_header_and_missing_poster() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "title,year,rating,poster\nHeat,1995,8.3,\nAlien,1979,8.5\n").unwrap();
        let storage = open_storage(&path, Backend::Csv);
        let movies = storage.list_movies().unwrap();
        assert_eq!(movies["Heat"].poster, "N/A");
        assert_eq!(movies["Alien"], Movie::new(1979, 8.5, "N/A"));

        storage.save(&movies).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("title,year,rating,poster\n"));
    }

    #[test]
    fn csv_empty_catalog_keeps_header() {
        let dir = TempDir::new().unwrap();
        let storage = open_storage(dir.path().join("movies.csv"), Backend::Csv);
        storage.save(&Catalog::new()).unwrap();
        assert_eq!(
            fs::read_to_string(storage.path()).unwrap(),
            "title,year,rating,poster\n"
        );
    }
}
