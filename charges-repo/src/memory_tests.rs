//! In-memory store tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use charges_types::{
        AppError, Charge, ChargeId, ChargeRepository, Cpf, Deposit, DepositRepository,
        EmailAddress, NewCharge, NewUser, Payment, PaymentMethod, PaymentRepository, PersonName,
        PositiveMoney, RepoError, TimeMillis, TransactionBoundary, User, UserId, UserRepository,
    };
    use rust_decimal_macros::dec;
    use tokio::sync::oneshot;

    use crate::InMemoryStore;

    fn user(name: &str, cpf: &str, email: &str) -> User {
        User::new(NewUser {
            name: PersonName::new(name).unwrap(),
            cpf: Cpf::new(cpf).unwrap(),
            email: EmailAddress::new(email).unwrap(),
            password_hash: "salt$digest".into(),
            created_at: TimeMillis::new(0).unwrap(),
        })
        .unwrap()
    }

    fn charge(issuer: UserId, payer: UserId) -> Charge {
        let created_at = TimeMillis::new(1_000).unwrap();
        Charge::new(NewCharge {
            issuer_id: issuer,
            payer_id: payer,
            amount: PositiveMoney::new(dec!(10)).unwrap(),
            description: None,
            created_at,
            due_at: created_at.plus_days(30).unwrap(),
        })
        .unwrap()
    }

    async fn two_users(store: &InMemoryStore) -> (User, User) {
        let alice = store
            .save_user(user("Alice Souza", "52998224725", "alice@example.com"))
            .await
            .unwrap();
        let bob = store
            .save_user(user("Bob Lima", "00000000191", "bob@example.com"))
            .await
            .unwrap();
        (alice, bob)
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let (alice, bob) = two_users(&store).await;

        assert_eq!(alice.id(), Some(UserId::new(1).unwrap()));
        assert_eq!(bob.id(), Some(UserId::new(2).unwrap()));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let store = InMemoryStore::new();
        let (mut alice, _) = two_users(&store).await;

        alice
            .increase_balance(PositiveMoney::new(dec!(5)).unwrap())
            .unwrap();
        let saved = store.save_user(alice.clone()).await.unwrap();
        assert_eq!(saved.id(), alice.id());

        let fetched = store.get_user(alice.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.balance().value(), dec!(5.00));
    }

    #[tokio::test]
    async fn test_duplicate_cpf_conflicts() {
        let store = InMemoryStore::new();
        two_users(&store).await;

        let result = store
            .save_user(user("Alice Clone", "529.982.247-25", "other@example.com"))
            .await;
        assert!(matches!(result, Err(RepoError::Conflict(msg)) if msg.contains("***.982.247-**")));
    }

    #[tokio::test]
    async fn test_find_by_cpf_and_email() {
        let store = InMemoryStore::new();
        let (alice, _) = two_users(&store).await;

        let by_cpf = store
            .find_user_by_cpf(&Cpf::new("52998224725").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_cpf.id(), alice.id());

        let by_email = store
            .find_user_by_email(&EmailAddress::new("ALICE@example.com").unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_get_or_throw_not_found_is_masked() {
        let store = InMemoryStore::new();
        let cpf = Cpf::new("52998224725").unwrap();

        let err = store.get_user_by_cpf_or_throw(&cpf).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("***.982.247-**"));
        assert!(!msg.contains("52998224725"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_charge_fails() {
        let store = InMemoryStore::new();
        let mut orphan = charge(UserId::new(1).unwrap(), UserId::new(2).unwrap());
        orphan.finalize_creation(ChargeId::new(99).unwrap()).unwrap();

        let result = store.save_charge(orphan).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_one_payment_per_charge() {
        let store = InMemoryStore::new();
        let (alice, bob) = two_users(&store).await;
        let stored = store
            .save_charge(charge(alice.id().unwrap(), bob.id().unwrap()))
            .await
            .unwrap();
        let charge_id = stored.id().unwrap();

        assert!(!store.payment_exists(charge_id).await.unwrap());
        store
            .save_payment(Payment::new(
                charge_id,
                PaymentMethod::Balance,
                TimeMillis::new(2_000).unwrap(),
            ))
            .await
            .unwrap();
        assert!(store.payment_exists(charge_id).await.unwrap());

        let second = store
            .save_payment(Payment::new(
                charge_id,
                PaymentMethod::Balance,
                TimeMillis::new(3_000).unwrap(),
            ))
            .await;
        assert!(matches!(second, Err(RepoError::Conflict(_))));
        assert_eq!(store.payment_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_execute_commits_on_success() {
        let store = InMemoryStore::new();
        let (alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();

        let store_ref = &store;
        let saved = store
            .execute(move || async move {
                assert!(store_ref.in_transaction());
                let deposit = Deposit::new(
                    user_id,
                    PositiveMoney::new(dec!(10)).unwrap(),
                    TimeMillis::new(0).unwrap(),
                );
                Ok(store_ref.save_deposit(deposit).await?)
            })
            .await
            .unwrap();

        assert!(!store.in_transaction());
        assert!(store.get_deposit(saved.id().unwrap()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_execute_rolls_back_on_error() {
        let store = InMemoryStore::new();
        let (mut alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();

        let store_ref = &store;
        let result: Result<(), AppError> = store
            .execute(move || async move {
                alice
                    .increase_balance(PositiveMoney::new(dec!(50)).unwrap())
                    .unwrap();
                store_ref.save_user(alice).await?;
                store_ref
                    .save_deposit(Deposit::new(
                        user_id,
                        PositiveMoney::new(dec!(50)).unwrap(),
                        TimeMillis::new(0).unwrap(),
                    ))
                    .await?;
                Err(AppError::NotAuthorized("declined".into()))
            })
            .await;

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
        let reloaded = store.get_user(user_id).await.unwrap().unwrap();
        assert_eq!(reloaded.balance().value(), dec!(0.00));
        assert_eq!(store.deposit_count().unwrap(), 0);
        assert!(!store.in_transaction());
    }

    #[tokio::test]
    async fn test_outside_reader_never_sees_uncommitted_writes() {
        let store = InMemoryStore::new();
        let (alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();
        let (written_tx, written_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let store_ref = &store;
        let unit = store.execute(move || async move {
            let mut alice = alice;
            alice
                .increase_balance(PositiveMoney::new(dec!(50)).unwrap())
                .unwrap();
            store_ref.save_user(alice).await?;
            assert_eq!(
                store_ref.get_user(user_id).await?.unwrap().balance().value(),
                dec!(50.00)
            );
            written_tx.send(()).unwrap();
            release_rx.await.unwrap();
            Err::<(), _>(AppError::NotAuthorized("declined".into()))
        });
        let reader = async {
            written_rx.await.unwrap();
            let seen = store.get_user(user_id).await.unwrap().unwrap();
            let inside = store.in_transaction();
            release_tx.send(()).unwrap();
            (seen.balance().value(), inside)
        };

        let (result, (seen_balance, reader_inside)) = tokio::join!(unit, reader);

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
        assert_eq!(seen_balance, dec!(0.00));
        assert!(!reader_inside);
        let committed = store.get_user(user_id).await.unwrap().unwrap();
        assert_eq!(committed.balance().value(), dec!(0.00));
    }

    #[tokio::test]
    async fn test_commit_becomes_visible_only_after_success() {
        let store = InMemoryStore::new();
        let (alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();
        let (written_tx, written_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let store_ref = &store;
        let unit = store.execute(move || async move {
            store_ref
                .save_deposit(Deposit::new(
                    user_id,
                    PositiveMoney::new(dec!(5)).unwrap(),
                    TimeMillis::new(0).unwrap(),
                ))
                .await?;
            written_tx.send(()).unwrap();
            release_rx.await.unwrap();
            Ok(())
        });
        let reader = async {
            written_rx.await.unwrap();
            let during = store.deposit_count().unwrap();
            release_tx.send(()).unwrap();
            during
        };

        let (result, during) = tokio::join!(unit, reader);

        result.unwrap();
        assert_eq!(during, 0);
        assert_eq!(store.deposit_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_panicking_unit_of_work_commits_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let (alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();

        let task_store = Arc::clone(&store);
        let handle = tokio::spawn(async move {
            let inner = Arc::clone(&task_store);
            task_store
                .execute(move || async move {
                    inner
                        .save_deposit(Deposit::new(
                            user_id,
                            PositiveMoney::new(dec!(10)).unwrap(),
                            TimeMillis::new(0).unwrap(),
                        ))
                        .await?;
                    let fail = true;
                    if fail {
                        panic!("unit of work failed hard");
                    }
                    Ok(())
                })
                .await
        });

        assert!(handle.await.unwrap_err().is_panic());
        assert_eq!(store.deposit_count().unwrap(), 0);
        assert!(!store.in_transaction());

        // The gate was released by the unwinding unit.
        store
            .save_deposit(Deposit::new(
                user_id,
                PositiveMoney::new(dec!(10)).unwrap(),
                TimeMillis::new(0).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(store.deposit_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_nested_unit_joins_the_outer_one() {
        let store = InMemoryStore::new();
        let (alice, _) = two_users(&store).await;
        let user_id = alice.id().unwrap();

        let store_ref = &store;
        let result: Result<(), AppError> = store
            .execute(move || async move {
                store_ref
                    .execute(move || async move {
                        store_ref
                            .save_deposit(Deposit::new(
                                user_id,
                                PositiveMoney::new(dec!(1)).unwrap(),
                                TimeMillis::new(0).unwrap(),
                            ))
                            .await?;
                        Ok(())
                    })
                    .await?;
                Err(AppError::NotAuthorized("declined".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.deposit_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_in_transaction_is_scoped_to_its_store() {
        let store = InMemoryStore::new();
        let other = InMemoryStore::new();

        let (store_ref, other_ref) = (&store, &other);
        store
            .execute(move || async move {
                assert!(store_ref.in_transaction());
                assert!(!other_ref.in_transaction());
                Ok(())
            })
            .await
            .unwrap();
    }
}
