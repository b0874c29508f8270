use speculate2::speculate;

speculate! {
    use notes_core::{Error, MemoryDocuments, NewNote, Note, NoteChanges, NoteService};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    fn setup() -> (NoteService<Arc<MemoryDocuments>>, Arc<MemoryDocuments>) {
        let store = Arc::new(MemoryDocuments::new());
        (NoteService::new(store.clone()), store)
    }

    fn create(service: &NoteService<Arc<MemoryDocuments>>, content: &str) -> Note {
        block_on(service.create_note(NewNote::from_content(content, "user-001")))
            .expect("Failed to create note")
    }

    // Timestamps have millisecond precision; make consecutive writes distinguishable.
    fn tick() {
        std::thread::sleep(Duration::from_millis(5));
    }

    describe "create_note" {
        it "stores short content as its own title" {
            let (service, _) = setup();
            let note = create(&service, "Buy milk");

            assert_eq!(note.title, "Buy milk");
            assert_eq!(note.content, "Buy milk");
            assert_eq!(note.created_at, note.updated_at);
        }

        it "truncates the title of long content to 50 characters" {
            let (service, _) = setup();
            let content: String = ('a'..='z').cycle().take(80).collect();
            let note = create(&service, &content);

            assert_eq!(note.title, &content[..50]);
            assert_eq!(note.content, content);
        }

        it "assigns unique ids that stay stable across reads" {
            let (service, _) = setup();
            let created: Vec<Note> = (0..10).map(|i| create(&service, &format!("note {i}"))).collect();

            let ids: HashSet<_> = created.iter().map(|n| n.id.clone()).collect();
            assert_eq!(ids.len(), 10);

            let listed: HashSet<_> = block_on(service.get_notes(None))
                .unwrap()
                .into_iter()
                .map(|n| n.id)
                .collect();
            assert_eq!(listed, ids);
        }
    }

    describe "get_notes" {
        it "returns the newest note first" {
            let (service, _) = setup();
            let a = create(&service, "A");
            tick();
            let b = create(&service, "B");

            let notes = block_on(service.get_notes(None)).unwrap();
            let ids: Vec<_> = notes.iter().map(|n| n.id.as_str()).collect();
            assert_eq!(ids, [b.id.as_str(), a.id.as_str()]);
        }

        it "returns an empty list for an empty collection" {
            let (service, _) = setup();
            assert!(block_on(service.get_notes(None)).unwrap().is_empty());
        }

        it "propagates backend failures unchanged" {
            let (service, store) = setup();
            store.fail_next(Error::Backend {
                status: 401,
                kind: "user_unauthorized".into(),
                message: "not authorized".into(),
            });

            let err = block_on(service.get_notes(None)).unwrap_err();
            assert_eq!(err.to_string(), "not authorized");
        }
    }

    describe "update_note" {
        it "keeps created_at and advances updated_at" {
            let (service, _) = setup();
            let before = create(&service, "first draft");
            tick();

            let after = block_on(service.update_note(&before.id, NoteChanges::from_content("second draft")))
                .unwrap();

            assert_eq!(after.id, before.id);
            assert_eq!(after.created_at, before.created_at);
            assert!(after.updated_at > before.updated_at);
            assert!(after.updated_at > after.created_at);
            assert_eq!(after.title, "second draft");
        }

        it "shows the new content on reload" {
            let (service, _) = setup();
            let note = create(&service, "old");
            tick();
            block_on(service.update_note(&note.id, NoteChanges::from_content("new"))).unwrap();

            let reloaded = block_on(service.get_notes(None)).unwrap();
            assert_eq!(reloaded[0].content, "new");
            assert_eq!(reloaded[0].user_id, "user-001");
        }

        it "fails for an unknown id" {
            let (service, _) = setup();
            let err = block_on(service.update_note("missing", NoteChanges::from_content("x"))).unwrap_err();
            assert!(err.is_not_found());
        }
    }

    describe "delete_note" {
        it "removes the note from later listings" {
            let (service, store) = setup();
            let keep = create(&service, "keep");
            let gone = create(&service, "gone");

            block_on(service.delete_note(&gone.id)).unwrap();

            let notes = block_on(service.get_notes(None)).unwrap();
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].id, keep.id);
            assert!(store.get(&gone.id).is_none());
        }

        it "fails for an unknown id and leaves the collection alone" {
            let (service, store) = setup();
            create(&service, "keep");

            let err = block_on(service.delete_note("missing")).unwrap_err();

            assert!(err.is_not_found());
            assert_eq!(store.len(), 1);
        }
    }
}
