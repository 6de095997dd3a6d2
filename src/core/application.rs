//! Membership applications and the review workflow.
//!
//! A decision is written first; membership provisioning and the member
//! counter follow as best-effort steps whose failures are logged and never
//! reported to the caller. `sync_member_count` reconciles the counter
//! afterwards.

use chrono::Utc;
use uuid::Uuid;

use crate::core::community::adjust_member_count;
use crate::core::models::application::{Application, ApplicationStatus, Insert, StatusUpdate, Submission, Transition};
use crate::core::models::common::{normalize_email, parse_identifier, require_non_blank, validate_email};
use crate::core::models::membership::Insert as MembershipInsert;
use crate::core::ports::repository::{ApplicationCommon, CommunityCommon, Manager, MembershipCommon, Store};
use crate::error::Error;

pub async fn submit_application<M>(manager: &M, community_id: &str, user_fallback: Option<Uuid>, data: Submission) -> Result<Application, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id).map_err(|err| Error::Validation(err.to_string()))?;
    require_non_blank("name", &data.name)?;
    validate_email(&data.email)?;
    let email = normalize_email(&data.email);

    let mut db = manager.db().await?;
    if CommunityCommon::get(&mut db, community_id).await?.is_none() {
        return Err(Error::NotFound(format!("community {}", community_id)));
    }
    if ApplicationCommon::exists_pending(&mut db, community_id, &email).await? {
        return Err(Error::Conflict(format!("an application for {} is already awaiting review in this community", email)));
    }
    if MembershipCommon::exists(&mut db, community_id, &email).await? {
        return Err(Error::Conflict(format!("{} is already a member of this community", email)));
    }
    let app = ApplicationCommon::insert(
        &mut db,
        Insert {
            id: Uuid::new_v4(),
            community_id,
            user_id: data.user_id.or(user_fallback),
            name: data.name.trim().to_owned(),
            email,
            phone: non_blank(data.phone),
            message: non_blank(data.message),
            why_join: non_blank(data.why_join),
            skills: data.skills.into_iter().map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).collect(),
            experience: non_blank(data.experience),
            applied_at: Utc::now(),
        },
    )
    .await?;
    log::info!("application {} submitted to community {}", app.id, community_id);
    Ok(app)
}

pub async fn list_applications<M>(manager: &M, community_id: &str, status: Option<ApplicationStatus>) -> Result<Vec<Application>, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let mut db = manager.db().await?;
    ApplicationCommon::query_by_community(&mut db, community_id, status).await
}

pub async fn approve_application<M>(manager: &M, community_id: &str, application_id: &str, reviewer_id: Option<Uuid>) -> Result<Application, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let application_id = parse_identifier("application_id", application_id)?;
    let mut db = manager.db().await?;
    let current = load(&mut db, community_id, application_id).await?;
    current.status.transition(ApplicationStatus::Approved)?;
    let approved = decide(
        &mut db,
        &current,
        StatusUpdate {
            status: ApplicationStatus::Approved,
            reviewed_at: Utc::now(),
            reviewed_by: reviewer_id,
            review_notes: current.review_notes.clone(),
        },
    )
    .await?;
    log::info!("application {} approved by {:?}", approved.id, reviewer_id);
    provision_membership(&mut db, &approved).await;
    Ok(approved)
}

pub async fn reject_application<M>(
    manager: &M,
    community_id: &str,
    application_id: &str,
    reviewer_id: Option<Uuid>,
    notes: Option<String>,
) -> Result<Application, Error>
where
    M: Manager,
{
    let community_id = parse_identifier("community_id", community_id)?;
    let application_id = parse_identifier("application_id", application_id)?;
    let mut db = manager.db().await?;
    let current = load(&mut db, community_id, application_id).await?;
    let transition = current.status.transition(ApplicationStatus::Rejected)?;
    let rejected = decide(
        &mut db,
        &current,
        StatusUpdate {
            status: ApplicationStatus::Rejected,
            reviewed_at: Utc::now(),
            reviewed_by: reviewer_id,
            review_notes: non_blank(notes),
        },
    )
    .await?;
    log::info!("application {} rejected by {:?}", rejected.id, reviewer_id);
    if transition == Transition::Revoke {
        revoke_membership(&mut db, &rejected).await;
    }
    Ok(rejected)
}

async fn load<S>(db: &mut S, community_id: Uuid, application_id: Uuid) -> Result<Application, Error>
where
    S: Store,
{
    match ApplicationCommon::get(db, application_id).await? {
        Some(app) if app.community_id == community_id => Ok(app),
        _ => Err(Error::NotFound(format!("application {}", application_id))),
    }
}

async fn decide<S>(db: &mut S, current: &Application, update: StatusUpdate) -> Result<Application, Error>
where
    S: Store,
{
    let status = update.status;
    ApplicationCommon::update_status(db, current.id, current.status, update)
        .await?
        .ok_or_else(|| Error::Conflict(format!("application {} was reviewed by another request before it could be marked {}", current.id, status.as_str())))
}

async fn provision_membership<S>(db: &mut S, app: &Application)
where
    S: Store,
{
    match MembershipCommon::exists(db, app.community_id, &app.email).await {
        Ok(false) => {}
        Ok(true) => {
            log::info!("{} is already a member of community {}, skipping provisioning", app.email, app.community_id);
            return;
        }
        Err(err) => {
            log::warn!("could not check membership for application {}: {}", app.id, err);
            return;
        }
    }
    match MembershipCommon::insert(db, MembershipInsert::from_application(app, Utc::now())).await {
        Ok(membership) => {
            log::info!("membership {} provisioned from application {}", membership.id, app.id);
            adjust_member_count(db, app.community_id, 1).await;
        }
        Err(err) => log::error!("failed to provision membership for approved application {}: {}", app.id, err),
    }
}

async fn revoke_membership<S>(db: &mut S, app: &Application)
where
    S: Store,
{
    match MembershipCommon::delete_by_application(db, app.id).await {
        Ok(removed) if removed.total == 0 => log::info!("no membership was provisioned from application {}, nothing to revoke", app.id),
        Ok(removed) => {
            log::info!("revoked {} membership(s) for application {}", removed.total, app.id);
            if removed.active > 0 {
                adjust_member_count(db, app.community_id, -(removed.active as i64)).await;
            }
        }
        Err(err) => log::error!("failed to revoke membership for application {}: {}", app.id, err),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
