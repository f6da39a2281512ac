use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use wordshard::builder::build_from_words;
use wordshard::config::WordStoreConfig;
use wordshard::key::{ShardKey, shard_key};
use wordshard::pack::{ArchiveFormat, pack_storage};
use wordshard::storage::file::FileStorageConfig;
use wordshard::storage::{StorageConfig, StorageFactory};
use wordshard::store::storage_store::StorageStore;
use wordshard::store::{AccessModel, EntryStore, open_archive};
use wordshard::word_store::WordStore;

const WORDS: &[&str] = &[
    "a", "Aachen", "aardvark", "aardvarks", "abacus", "Abba", "abbey", "I", "ox", "Polish",
    "polish", "polished", "prenewtonian", "zoo", "zoology",
];

/// A word list built once and exposed through every store variant.
struct Fixture {
    _dir: TempDir,
    config: WordStoreConfig,
    stores: Vec<(&'static str, Arc<dyn EntryStore>)>,
}

impl Fixture {
    fn new(words: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let config = WordStoreConfig::new(3, "english_words_all/");

        let build_dir = dir.path().join("english_words_all");
        let storage =
            StorageFactory::create(StorageConfig::File(FileStorageConfig::new(&build_dir)))
                .unwrap();
        build_from_words(words, storage.clone(), &config).unwrap();

        let zip_path = dir.path().join("english_words_all.zip");
        let tar_path = dir.path().join("english_words_all.tar");
        pack_storage(storage.as_ref(), &zip_path, ArchiveFormat::Zip, &config.base_path).unwrap();
        pack_storage(storage.as_ref(), &tar_path, ArchiveFormat::Tar, &config.base_path).unwrap();

        let stores: Vec<(&'static str, Arc<dyn EntryStore>)> = vec![
            ("storage", Arc::new(StorageStore::new(storage))),
            (
                "zip",
                open_archive(&zip_path, ArchiveFormat::Zip, &config.base_path).unwrap(),
            ),
            (
                "tar",
                open_archive(&tar_path, ArchiveFormat::Tar, &config.base_path).unwrap(),
            ),
        ];

        Fixture {
            _dir: dir,
            config,
            stores,
        }
    }

    fn word_stores(&self) -> Vec<(&'static str, WordStore)> {
        self.stores
            .iter()
            .map(|(name, store)| {
                let words = WordStore::new(store.clone(), &self.config).unwrap();
                words.build_index().unwrap();
                (*name, words)
            })
            .collect()
    }
}

#[test]
fn test_access_models() {
    let fixture = Fixture::new(WORDS);
    let models: Vec<AccessModel> = fixture
        .word_stores()
        .iter()
        .map(|(_, words)| words.access_model())
        .collect();

    assert_eq!(
        models,
        vec![
            AccessModel::RandomAccess,
            AccessModel::RandomAccess,
            AccessModel::Sequential
        ]
    );
}

#[test]
fn test_partition_correctness() {
    let fixture = Fixture::new(WORDS);

    for (name, store) in &fixture.stores {
        let entries = store.entry_names().unwrap();
        let mut seen = 0;

        for entry in &entries {
            let mut lines = Vec::new();
            store
                .scan_entry(entry, &mut |line: &str| {
                    lines.push(line.to_string());
                    std::ops::ControlFlow::Continue(())
                })
                .unwrap()
                .unwrap();

            for line in &lines {
                let key = shard_key(line, fixture.config.prefix_length);
                match key {
                    ShardKey::Short => assert_eq!(entry, ".shortnames", "{name}: {line}"),
                    ShardKey::Prefix(prefix) => assert_eq!(*entry, prefix, "{name}: {line}"),
                }
            }
            seen += lines.len();
        }

        assert_eq!(seen, WORDS.len(), "{name}");
    }
}

#[test]
fn test_resolve_round_trip() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        for word in WORDS {
            assert_eq!(
                words.resolve_with(word, true).unwrap().as_deref(),
                Some(*word),
                "{name}"
            );
        }
    }
}

#[test]
fn test_case_insensitive_resolution() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        assert_eq!(words.resolve("AARDVARK").unwrap().as_deref(), Some("aardvark"), "{name}");
        assert_eq!(words.resolve("aachen").unwrap().as_deref(), Some("Aachen"), "{name}");
        assert_eq!(words.resolve("i").unwrap().as_deref(), Some("I"), "{name}");
        assert_eq!(words.resolve("A").unwrap().as_deref(), Some("a"), "{name}");
        // Two casings stored: the first written wins.
        assert_eq!(words.resolve("POLISH").unwrap().as_deref(), Some("Polish"), "{name}");
        assert!(words.contains("PreNewtonian").unwrap(), "{name}");
        assert!(!words.contains_with("ZOO", true).unwrap(), "{name}");
    }
}

#[test]
fn test_not_found() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        for absent in ["cat", "precip", "aardvarkz", "oxen", "b", ""] {
            assert_eq!(words.resolve(absent).unwrap(), None, "{name}: {absent}");
            assert!(!words.contains(absent).unwrap(), "{name}: {absent}");
        }
    }
}

#[test]
fn test_unnamable_queries_are_not_found() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        for absent in ["../x", "..", "a\0bc", "a/bc", "ab\\c", ".shortnames"] {
            assert_eq!(words.resolve(absent).unwrap(), None, "{name}: {absent:?}");
            assert!(!words.contains_with(absent, true).unwrap(), "{name}: {absent:?}");
        }
    }
}

#[test]
fn test_final_sigma_resolution() {
    let fixture = Fixture::new(&["ΟΔΟΣ", "οδσα"]);

    for (name, words) in fixture.word_stores() {
        assert_eq!(words.resolve("ΟΔΟΣ").unwrap().as_deref(), Some("ΟΔΟΣ"), "{name}");
        assert_eq!(words.resolve("οδοσ").unwrap().as_deref(), Some("ΟΔΟΣ"), "{name}");
        assert_eq!(words.resolve("ΟΔΣΑ").unwrap().as_deref(), Some("οδσα"), "{name}");
        assert_eq!(words.count().unwrap(), 2, "{name}");
    }
}

#[test]
fn test_count_invariant() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        assert_eq!(words.count().unwrap(), WORDS.len(), "{name}");
    }
}

#[test]
fn test_filter_limit_is_prefix() {
    let fixture = Fixture::new(WORDS);

    for (name, words) in fixture.word_stores() {
        let all = words.filter(|w| w.to_lowercase().contains('o'), None).unwrap();
        assert_eq!(all.len(), 7, "{name}: {all:?}");

        for k in 0..=all.len() + 1 {
            let limited = words
                .filter(|w| w.to_lowercase().contains('o'), Some(k))
                .unwrap();
            assert_eq!(limited.len(), k.min(all.len()), "{name}");
            assert_eq!(limited[..], all[..limited.len()], "{name}");
        }
    }
}

#[test]
fn test_enumeration_matches_across_variants() {
    let fixture = Fixture::new(WORDS);

    let mut per_store = Vec::new();
    for (_, words) in fixture.word_stores() {
        let mut seen = Vec::new();
        words.words(|w| seen.push(w.to_string())).unwrap();
        seen.sort();
        per_store.push(seen);
    }

    let mut expected: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
    expected.sort();
    for seen in per_store {
        assert_eq!(seen, expected);
    }
}

#[test]
fn test_scenario() {
    let fixture = Fixture::new(&["ant", "ants", "boa", "boat", "ox"]);

    for (name, store) in &fixture.stores {
        let mut entries = store.entry_names().unwrap();
        entries.sort();
        assert_eq!(entries, vec![".shortnames", "ant", "boa"], "{name}");
    }

    for (name, words) in fixture.word_stores() {
        assert_eq!(words.resolve("ANT").unwrap().as_deref(), Some("ant"), "{name}");
        assert_eq!(words.resolve("OX").unwrap().as_deref(), Some("ox"), "{name}");
        assert_eq!(words.resolve("cat").unwrap(), None, "{name}");
    }
}

#[test]
fn test_concurrent_first_queries_on_tar_store() {
    let fixture = Fixture::new(WORDS);
    let (_, tar_store) = fixture
        .stores
        .iter()
        .find(|(name, _)| *name == "tar")
        .unwrap();

    // No build_index call: the threads race the lazy build.
    let words = WordStore::new(tar_store.clone(), &fixture.config).unwrap();

    thread::scope(|scope| {
        for word in WORDS {
            let words = &words;
            scope.spawn(move || {
                let upper = word.to_uppercase();
                assert!(words.contains(&upper).unwrap(), "{word}");
                assert_eq!(words.count().unwrap(), WORDS.len());
            });
        }
    });

    let mut names = tar_store.entry_names().unwrap();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), tar_store.entry_names().unwrap().len());
}
