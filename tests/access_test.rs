mod common;

use anyhow::Result;
use bankea::domain::{Capability, LedgerError, Role, User};
use common::StandardBank;

#[test]
fn test_clients_only_view_their_own_accounts() -> Result<()> {
    let fx = StandardBank::create()?;

    fx.bank
        .authorize(&fx.client, Capability::ViewAccount, Some(&fx.checking))?;
    assert_eq!(
        fx.bank
            .authorize(&fx.client, Capability::ViewAccount, Some(&fx.foreign))
            .unwrap_err(),
        LedgerError::Unauthorized {
            username: "alice".into(),
            capability: Capability::ViewAccount,
        }
    );
    assert!(fx
        .bank
        .authorize(&fx.client, Capability::ViewAccount, None)
        .is_err());
    assert!(fx
        .bank
        .authorize(&fx.client, Capability::MoveFunds, Some(&fx.checking))
        .is_err());
    Ok(())
}

#[test]
fn test_role_capabilities() -> Result<()> {
    let fx = StandardBank::create()?;
    let all = [
        Capability::ViewAccount,
        Capability::MoveFunds,
        Capability::OpenAccount,
        Capability::SubmitMortgage,
        Capability::ReviewMortgage,
        Capability::RegisterUser,
        Capability::AssignRole,
    ];

    let allowed = |user: &User| -> Vec<Capability> {
        all.iter()
            .copied()
            .filter(|cap| fx.bank.authorize(user, *cap, Some(&fx.foreign)).is_ok())
            .collect()
    };

    assert_eq!(
        allowed(&fx.desk),
        vec![
            Capability::ViewAccount,
            Capability::MoveFunds,
            Capability::OpenAccount,
            Capability::SubmitMortgage,
            Capability::RegisterUser,
        ]
    );
    assert_eq!(allowed(&fx.credit), vec![Capability::ReviewMortgage]);
    assert_eq!(
        allowed(&fx.admin),
        vec![Capability::RegisterUser, Capability::AssignRole]
    );
    assert!(allowed(&fx.client).is_empty());
    Ok(())
}

#[test]
fn test_deactivated_users_lose_everything() -> Result<()> {
    let mut fx = StandardBank::create()?;
    let desk = fx.bank.deactivate_user("desk")?;

    assert!(desk.is_inactive());
    assert!(fx
        .bank
        .authorize(&desk, Capability::MoveFunds, Some(&fx.checking))
        .is_err());
    assert_eq!(
        fx.bank.login("desk", "desk-pw").unwrap_err(),
        LedgerError::UserInactive("desk".into())
    );
    Ok(())
}

#[test]
fn test_login_and_registration() -> Result<()> {
    let mut fx = StandardBank::create()?;

    assert_eq!(fx.bank.login("alice", "alice-pw")?.id, fx.client.id);
    assert_eq!(
        fx.bank.login("alice", "nope").unwrap_err(),
        LedgerError::InvalidCredentials
    );

    let carol = fx.bank.create_user(
        "carol".into(),
        "carol-pw".into(),
        "carol@bankea.test".into(),
        Role::Client,
    )?;
    assert_eq!(fx.bank.get_user_by_username("carol")?.id, carol.id);
    assert!(matches!(
        fx.bank.create_user(
            "carol".into(),
            "x".into(),
            "carol2@bankea.test".into(),
            Role::Client
        ),
        Err(LedgerError::UsernameTaken(_))
    ));
    assert!(matches!(
        fx.bank.get_user_by_username("dave"),
        Err(LedgerError::UserNotFound(_))
    ));
    Ok(())
}
