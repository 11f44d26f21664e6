//! Administration of care recipients and caregivers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::error_mapping::{map_care_recipient_error, map_caregiver_error};
use crate::domain::guest_access_service::ACCESS_CODE_ATTEMPTS;
use crate::domain::ports::{
    CareRecipientRepository, CareTeamCommand, CaregiverRepository, CaregiverRepositoryError,
    CreateCareRecipientRequest, CreateCaregiverRequest,
};
use crate::domain::validation::{optional_text, require_text};
use crate::domain::{
    AccessCode, CareRecipient, CareRecipientId, Caregiver, CaregiverId, Error, NewCaregiver,
    NewCaregiverContact,
};

/// Service implementing [`CareTeamCommand`].
#[derive(Clone)]
pub struct CareTeamService<R, C> {
    recipients: Arc<R>,
    caregivers: Arc<C>,
}

impl<R, C> CareTeamService<R, C> {
    /// Create the service from its repositories.
    pub fn new(recipients: Arc<R>, caregivers: Arc<C>) -> Self {
        Self {
            recipients,
            caregivers,
        }
    }
}

fn normalise_contact(contact: NewCaregiverContact) -> Result<NewCaregiverContact, Error> {
    match contact {
        NewCaregiverContact::Linked(profile_id) => Ok(NewCaregiverContact::Linked(profile_id)),
        NewCaregiverContact::Guest { name, phone, email } => Ok(NewCaregiverContact::Guest {
            name: require_text("name", &name)?,
            phone: optional_text(phone),
            email: optional_text(email),
        }),
    }
}

#[async_trait]
impl<R, C> CareTeamCommand for CareTeamService<R, C>
where
    R: CareRecipientRepository,
    C: CaregiverRepository,
{
    async fn list_care_recipients(&self) -> Result<Vec<CareRecipient>, Error> {
        self.recipients.list().await.map_err(map_care_recipient_error)
    }

    async fn create_care_recipient(
        &self,
        request: CreateCareRecipientRequest,
    ) -> Result<CareRecipient, Error> {
        let recipient = CareRecipient {
            id: CareRecipientId::random(),
            name: require_text("name", &request.name)?,
            date_of_birth: request.date_of_birth,
            notes: optional_text(request.notes),
        };
        self.recipients
            .create(&recipient)
            .await
            .map_err(map_care_recipient_error)?;
        info!(care_recipient_id = %recipient.id, "care recipient created");
        Ok(recipient)
    }

    async fn delete_care_recipient(&self, id: &CareRecipientId) -> Result<(), Error> {
        if self
            .recipients
            .delete(id)
            .await
            .map_err(map_care_recipient_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("care recipient not found"))
        }
    }

    async fn list_caregivers(&self) -> Result<Vec<Caregiver>, Error> {
        self.caregivers.list().await.map_err(map_caregiver_error)
    }

    async fn create_caregiver(&self, request: CreateCaregiverRequest) -> Result<Caregiver, Error> {
        let contact = normalise_contact(request.contact)?;
        let id = CaregiverId::random();
        let attempts = if request.issue_access_code {
            ACCESS_CODE_ATTEMPTS
        } else {
            1
        };

        for attempt in 1..=attempts {
            let access_code = request
                .issue_access_code
                .then(|| AccessCode::generate(&mut rand::thread_rng()));
            let draft = NewCaregiver {
                id,
                contact: contact.clone(),
                access_code,
                is_active: true,
            };
            match self.caregivers.create(&draft).await {
                Ok(created) => {
                    info!(caregiver_id = %created.id, guest = created.is_guest(), "caregiver created");
                    return Ok(created);
                }
                Err(CaregiverRepositoryError::AccessCodeTaken) => {
                    warn!(attempt, "access code collision while creating caregiver");
                }
                Err(other) => return Err(map_caregiver_error(other)),
            }
        }
        Err(Error::conflict("could not allocate an unused access code"))
    }

    async fn set_caregiver_active(&self, id: &CaregiverId, is_active: bool) -> Result<(), Error> {
        if self
            .caregivers
            .set_active(id, is_active)
            .await
            .map_err(map_caregiver_error)?
        {
            info!(caregiver_id = %id, is_active, "caregiver active flag changed");
            Ok(())
        } else {
            Err(Error::not_found("caregiver not found"))
        }
    }

    async fn delete_caregiver(&self, id: &CaregiverId) -> Result<(), Error> {
        if self
            .caregivers
            .delete(id)
            .await
            .map_err(map_caregiver_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("caregiver not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockCareRecipientRepository, MockCaregiverRepository};
    use crate::domain::{CaregiverContact, ErrorCode};
    use rstest::rstest;

    fn service(
        recipients: MockCareRecipientRepository,
        caregivers: MockCaregiverRepository,
    ) -> CareTeamService<MockCareRecipientRepository, MockCaregiverRepository> {
        CareTeamService::new(Arc::new(recipients), Arc::new(caregivers))
    }

    fn created_from(draft: &NewCaregiver) -> Caregiver {
        let contact = match &draft.contact {
            NewCaregiverContact::Guest { name, phone, email } => CaregiverContact::Guest {
                name: name.clone(),
                phone: phone.clone(),
                email: email.clone(),
            },
            NewCaregiverContact::Linked(profile_id) => CaregiverContact::Linked {
                profile_id: *profile_id,
                name: "Linked".to_owned(),
                email: "linked@example.org".to_owned(),
            },
        };
        Caregiver {
            id: draft.id,
            contact,
            access_code: draft.access_code.clone(),
            is_active: draft.is_active,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn blank_recipient_names_are_rejected() {
        let mut recipients = MockCareRecipientRepository::new();
        recipients.expect_create().never();

        let err = service(recipients, MockCaregiverRepository::new())
            .create_care_recipient(CreateCareRecipientRequest {
                name: "  ".to_owned(),
                date_of_birth: None,
                notes: None,
            })
            .await
            .expect_err("blank name");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn guest_caregivers_can_receive_a_code_on_creation() {
        let mut caregivers = MockCaregiverRepository::new();
        caregivers
            .expect_create()
            .withf(|draft| draft.access_code.is_some())
            .times(1)
            .returning(|draft| Ok(created_from(draft)));

        let created = service(MockCareRecipientRepository::new(), caregivers)
            .create_caregiver(CreateCaregiverRequest {
                contact: NewCaregiverContact::Guest {
                    name: " Grace ".to_owned(),
                    phone: Some(String::new()),
                    email: None,
                },
                issue_access_code: true,
            })
            .await
            .expect("caregiver created");

        assert_eq!(created.display_name(), "Grace");
        assert!(created.access_code.is_some());
        assert!(created.is_guest());
    }

    #[rstest]
    #[tokio::test]
    async fn code_collisions_on_creation_retry_with_fresh_codes() {
        let mut caregivers = MockCaregiverRepository::new();
        let mut calls = 0;
        caregivers.expect_create().times(2).returning(move |draft| {
            calls += 1;
            if calls == 1 {
                Err(CaregiverRepositoryError::access_code_taken())
            } else {
                Ok(created_from(draft))
            }
        });

        service(MockCareRecipientRepository::new(), caregivers)
            .create_caregiver(CreateCaregiverRequest {
                contact: NewCaregiverContact::Guest {
                    name: "Grace".to_owned(),
                    phone: None,
                    email: None,
                },
                issue_access_code: true,
            })
            .await
            .expect("second attempt succeeds");
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn deactivating_reports_missing_caregivers(#[case] found: bool) {
        let mut caregivers = MockCaregiverRepository::new();
        caregivers
            .expect_set_active()
            .times(1)
            .return_once(move |_, _| Ok(found));

        let result = service(MockCareRecipientRepository::new(), caregivers)
            .set_caregiver_active(&CaregiverId::random(), false)
            .await;

        match (found, result) {
            (true, Ok(())) => {}
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::NotFound),
            (_, other) => panic!("unexpected outcome: {other:?}"),
        }
    }
}
