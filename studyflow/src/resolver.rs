//! Reference resolver: the only code that converts between the remote
//! document shape (live references, anchored instants) and the local
//! record shape (plain IDs, plain date/time components).
//!
//! Three jobs:
//! - **resolve**: turn caller-supplied details into a remote document or
//!   patch plus the matching local record, disambiguating each reference
//!   input (unset / bare ID / embedded entity) into a deterministic
//!   document reference;
//! - **flatten**: turn a fetched remote document back into a local
//!   record, tolerating malformed fields rather than failing;
//! - **inflate**: join flattened records against the local subject and
//!   project collections for read-side views, treating dangling
//!   references as absent.
//!
//! Logically-empty references always resolve to the shared `"None"`
//! sentinel documents, never to a null field.

use serde_json::Value;

use studyflow_model::{
    EntityStatus, LmsOrigin, NONE_SENTINEL, Project, ProjectView, RefInput, RefKind, Subject, Task,
    TaskPriority, TaskStatus, TaskView,
};

use crate::dates;
use crate::managers::{ProjectDetails, SubjectDetails, TaskDetails};
use crate::remote::{DocPatch, DocRef, Document, FieldPatch};
use crate::session::Session;

/// Global collection holding the shared no-subject sentinel document.
const NONE_SUBJECT_COLLECTION: &str = "noneSubject";
/// Global collection holding the shared no-project sentinel document.
const NONE_PROJECT_COLLECTION: &str = "noneProject";

/// A resolved write: the remote document and its local mirror.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub doc: Document,
    pub record: T,
}

/// A resolved partial update: the remote patch and the full local
/// record it produces.
#[derive(Debug, Clone)]
pub struct ResolvedPatch<T> {
    pub patch: DocPatch,
    pub record: T,
}

/// Resolves one reference input into a document reference.
///
/// Non-empty, non-sentinel IDs point into the session's collection for
/// `kind`; everything else points at the global sentinel document.
#[must_use]
pub fn resolve_ref(input: &RefInput, kind: RefKind, session: &Session) -> DocRef {
    let sentinel = |collection: &str| DocRef {
        collection: collection.to_string(),
        id: NONE_SENTINEL.to_string(),
    };
    match kind {
        RefKind::Subject => match input.id() {
            Some(id) if !id.is_empty() && id != NONE_SENTINEL => DocRef {
                collection: session.subjects().to_string(),
                id: id.to_string(),
            },
            _ => sentinel(NONE_SUBJECT_COLLECTION),
        },
        RefKind::Project => match input.id() {
            Some(id) if !id.is_empty() && id != NONE_SENTINEL => DocRef {
                collection: session.projects().to_string(),
                id: id.to_string(),
            },
            _ => sentinel(NONE_PROJECT_COLLECTION),
        },
    }
}

/// Resolves a project's subject set; an empty result collapses to the
/// sentinel singleton so the set is never empty.
#[must_use]
pub fn resolve_subject_set(inputs: &[RefInput], session: &Session) -> Vec<DocRef> {
    let mut refs: Vec<DocRef> = inputs
        .iter()
        .filter(|input| input.id().is_some_and(|id| !id.is_empty() && id != NONE_SENTINEL))
        .map(|input| resolve_ref(input, RefKind::Subject, session))
        .collect();
    if refs.is_empty() {
        refs.push(resolve_ref(&RefInput::Unset, RefKind::Subject, session));
    }
    refs
}

fn enum_value(display: impl std::fmt::Display) -> Value {
    Value::String(display.to_string())
}

fn lms_value(lms: &LmsOrigin) -> Value {
    serde_json::to_value(lms).unwrap_or(Value::Null)
}

/// A due time without a due date is meaningless; drop it rather than
/// producing a time-but-no-date record.
fn effective_due_time(details: &TaskDetails) -> Option<chrono::NaiveTime> {
    details.due_date.and(details.due_time)
}

/// Builds the full remote document and local record for a task write.
#[must_use]
pub fn resolve_task(session: &Session, id: &str, details: &TaskDetails) -> Resolved<Task> {
    let subject = resolve_ref(&details.subject, RefKind::Subject, session);
    let project = resolve_ref(&details.project, RefKind::Project, session);
    let due_time = effective_due_time(details);

    let mut doc = Document::new();
    doc.insert("name".to_string(), Value::String(details.name.clone()));
    doc.insert(
        "description".to_string(),
        Value::String(details.description.clone()),
    );
    doc.insert("priority".to_string(), enum_value(details.priority));
    doc.insert("status".to_string(), enum_value(details.status));
    doc.insert("subject".to_string(), subject.to_value());
    doc.insert("project".to_string(), project.to_value());
    if let Some(date) = details.start_date {
        doc.insert(
            "startDate".to_string(),
            Value::String(dates::instant_to_string(dates::start_of_day(date))),
        );
    }
    if let Some(date) = details.due_date {
        doc.insert(
            "dueDate".to_string(),
            Value::String(dates::instant_to_string(dates::end_of_day(date))),
        );
        if let Some(time) = due_time {
            doc.insert(
                "dueTime".to_string(),
                Value::String(dates::instant_to_string(dates::at_time(date, time))),
            );
        }
    }
    if let Some(lms) = &details.lms {
        doc.insert("lms".to_string(), lms_value(lms));
    }

    let record = Task {
        id: id.to_string(),
        name: details.name.clone(),
        description: details.description.clone(),
        priority: details.priority,
        status: details.status,
        subject: subject.id,
        project: project.id,
        start_date: details.start_date,
        due_date: details.due_date,
        due_time,
        lms: details.lms.clone(),
    };
    Resolved { doc, record }
}

/// Builds the remote patch and local record for a task update.
///
/// Optional fields absent from `details` are explicitly cleared; the
/// remote document never keeps a stale value the caller dropped.
#[must_use]
pub fn task_patch(session: &Session, id: &str, details: &TaskDetails) -> ResolvedPatch<Task> {
    let resolved = resolve_task(session, id, details);
    let mut patch = DocPatch::new();
    for field in ["name", "description", "priority", "status", "subject", "project"] {
        if let Some(value) = resolved.doc.get(field) {
            patch.insert(field.to_string(), FieldPatch::Set(value.clone()));
        }
    }
    for field in ["startDate", "dueDate", "dueTime", "lms"] {
        let op = resolved
            .doc
            .get(field)
            .map_or(FieldPatch::Clear, |value| FieldPatch::Set(value.clone()));
        patch.insert(field.to_string(), op);
    }
    ResolvedPatch {
        patch,
        record: resolved.record,
    }
}

/// Builds the full remote document and local record for a subject write.
#[must_use]
pub fn resolve_subject(id: &str, details: &SubjectDetails) -> Resolved<Subject> {
    let color = if details.color.is_empty() {
        "black".to_string()
    } else {
        details.color.clone()
    };
    let status = details.status.unwrap_or_default();

    let mut doc = Document::new();
    doc.insert("name".to_string(), Value::String(details.name.clone()));
    doc.insert(
        "semester".to_string(),
        Value::String(details.semester.clone()),
    );
    doc.insert(
        "description".to_string(),
        Value::String(details.description.clone()),
    );
    doc.insert("color".to_string(), Value::String(color.clone()));
    doc.insert("status".to_string(), enum_value(status));
    if let Some(lms) = &details.lms {
        doc.insert("lms".to_string(), lms_value(lms));
    }

    let record = Subject {
        id: id.to_string(),
        name: details.name.clone(),
        semester: details.semester.clone(),
        description: details.description.clone(),
        color,
        status,
        lms: details.lms.clone(),
    };
    Resolved { doc, record }
}

/// Builds the remote patch and local record for a subject update.
#[must_use]
pub fn subject_patch(id: &str, details: &SubjectDetails) -> ResolvedPatch<Subject> {
    let resolved = resolve_subject(id, details);
    let mut patch = DocPatch::new();
    for field in ["name", "semester", "description", "color", "status"] {
        if let Some(value) = resolved.doc.get(field) {
            patch.insert(field.to_string(), FieldPatch::Set(value.clone()));
        }
    }
    let lms = resolved
        .doc
        .get("lms")
        .map_or(FieldPatch::Clear, |value| FieldPatch::Set(value.clone()));
    patch.insert("lms".to_string(), lms);
    ResolvedPatch {
        patch,
        record: resolved.record,
    }
}

/// Builds the full remote document and local record for a project write.
#[must_use]
pub fn resolve_project(session: &Session, id: &str, details: &ProjectDetails) -> Resolved<Project> {
    let subjects = resolve_subject_set(&details.subjects, session);
    let status = details.status.unwrap_or_default();
    let due_time = details.due_date.and(details.due_time);

    let mut doc = Document::new();
    doc.insert("name".to_string(), Value::String(details.name.clone()));
    doc.insert(
        "description".to_string(),
        Value::String(details.description.clone()),
    );
    doc.insert(
        "subjects".to_string(),
        Value::Array(subjects.iter().map(DocRef::to_value).collect()),
    );
    doc.insert("status".to_string(), enum_value(status));
    if let Some(date) = details.due_date {
        doc.insert(
            "dueDate".to_string(),
            Value::String(dates::instant_to_string(dates::end_of_day(date))),
        );
        if let Some(time) = due_time {
            doc.insert(
                "dueTime".to_string(),
                Value::String(dates::instant_to_string(dates::at_time(date, time))),
            );
        }
    }

    let record = Project {
        id: id.to_string(),
        name: details.name.clone(),
        description: details.description.clone(),
        subjects: subjects.into_iter().map(|r| r.id).collect(),
        status,
        due_date: details.due_date,
        due_time,
    };
    Resolved { doc, record }
}

/// Builds the remote patch and local record for a project update.
#[must_use]
pub fn project_patch(
    session: &Session,
    id: &str,
    details: &ProjectDetails,
) -> ResolvedPatch<Project> {
    let resolved = resolve_project(session, id, details);
    let mut patch = DocPatch::new();
    for field in ["name", "description", "subjects", "status"] {
        if let Some(value) = resolved.doc.get(field) {
            patch.insert(field.to_string(), FieldPatch::Set(value.clone()));
        }
    }
    for field in ["dueDate", "dueTime"] {
        let op = resolved
            .doc
            .get(field)
            .map_or(FieldPatch::Clear, |value| FieldPatch::Set(value.clone()));
        patch.insert(field.to_string(), op);
    }
    ResolvedPatch {
        patch,
        record: resolved.record,
    }
}

fn field_str<'a>(doc: &'a Document, field: &str) -> &'a str {
    doc.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Flattens a reference field to its ID; anything unreadable becomes
/// the sentinel so local records stay resolvable.
fn flatten_ref(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(DocRef::from_value)
        .map_or_else(|| NONE_SENTINEL.to_string(), |r| r.id)
}

fn flatten_instant_date(doc: &Document, field: &str) -> Option<chrono::NaiveDate> {
    doc.get(field)
        .and_then(Value::as_str)
        .and_then(dates::instant_from_str)
        .map(|instant| instant.date())
}

fn flatten_lms(doc: &Document) -> Option<LmsOrigin> {
    doc.get("lms")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// Flattens a fetched task document into the local record shape.
///
/// Tolerant by contract: malformed references fall back to the
/// sentinel, malformed instants to `None`, unknown enum values to their
/// defaults. Never fails.
#[must_use]
pub fn flatten_task(id: &str, doc: &Document) -> Task {
    let due_date = flatten_instant_date(doc, "dueDate");
    let due_time = due_date.and_then(|_| {
        doc.get("dueTime")
            .and_then(Value::as_str)
            .and_then(dates::instant_from_str)
            .map(|instant| instant.time())
    });
    Task {
        id: id.to_string(),
        name: field_str(doc, "name").to_string(),
        description: field_str(doc, "description").to_string(),
        priority: doc
            .get("priority")
            .and_then(|v| serde_json::from_value::<TaskPriority>(v.clone()).ok())
            .unwrap_or_default(),
        status: doc
            .get("status")
            .and_then(|v| serde_json::from_value::<TaskStatus>(v.clone()).ok())
            .unwrap_or_default(),
        subject: flatten_ref(doc, "subject"),
        project: flatten_ref(doc, "project"),
        start_date: flatten_instant_date(doc, "startDate"),
        due_date,
        due_time,
        lms: flatten_lms(doc),
    }
}

/// Flattens a fetched subject document into the local record shape.
#[must_use]
pub fn flatten_subject(id: &str, doc: &Document) -> Subject {
    let color = field_str(doc, "color");
    Subject {
        id: id.to_string(),
        name: field_str(doc, "name").to_string(),
        semester: field_str(doc, "semester").to_string(),
        description: field_str(doc, "description").to_string(),
        color: if color.is_empty() {
            "black".to_string()
        } else {
            color.to_string()
        },
        status: doc
            .get("status")
            .and_then(|v| serde_json::from_value::<EntityStatus>(v.clone()).ok())
            .unwrap_or_default(),
        lms: flatten_lms(doc),
    }
}

/// Flattens a fetched project document into the local record shape.
#[must_use]
pub fn flatten_project(id: &str, doc: &Document) -> Project {
    let mut subjects: Vec<String> = doc
        .get("subjects")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(DocRef::from_value)
                .map(|r| r.id)
                .collect()
        })
        .unwrap_or_default();
    if subjects.is_empty() {
        subjects.push(NONE_SENTINEL.to_string());
    }
    let due_date = flatten_instant_date(doc, "dueDate");
    let due_time = due_date.and_then(|_| {
        doc.get("dueTime")
            .and_then(Value::as_str)
            .and_then(dates::instant_from_str)
            .map(|instant| instant.time())
    });
    Project {
        id: id.to_string(),
        name: field_str(doc, "name").to_string(),
        description: field_str(doc, "description").to_string(),
        subjects,
        status: doc
            .get("status")
            .and_then(|v| serde_json::from_value::<EntityStatus>(v.clone()).ok())
            .unwrap_or_default(),
        due_date,
        due_time,
    }
}

/// Joins tasks with their subjects and projects; dangling or sentinel
/// references inflate to `None`.
#[must_use]
pub fn inflate_tasks(tasks: Vec<Task>, subjects: &[Subject], projects: &[Project]) -> Vec<TaskView> {
    tasks
        .into_iter()
        .map(|task| {
            let subject = subjects.iter().find(|s| s.id == task.subject).cloned();
            let project = projects.iter().find(|p| p.id == task.project).cloned();
            TaskView {
                task,
                subject,
                project,
            }
        })
        .collect()
}

/// Joins projects with their resolvable subjects; dangling references
/// are filtered out.
#[must_use]
pub fn inflate_projects(projects: Vec<Project>, subjects: &[Subject]) -> Vec<ProjectView> {
    projects
        .into_iter()
        .map(|project| {
            let joined: Vec<Subject> = project
                .real_subjects()
                .filter_map(|id| subjects.iter().find(|s| s.id == id).cloned())
                .collect();
            ProjectView {
                project,
                subjects: joined,
            }
        })
        .collect()
}

/// The local mirror of the shared no-subject sentinel document.
#[must_use]
pub fn sentinel_subject() -> Subject {
    Subject {
        id: NONE_SENTINEL.to_string(),
        name: NONE_SENTINEL.to_string(),
        semester: String::new(),
        description: String::new(),
        color: "black".to_string(),
        status: EntityStatus::Active,
        lms: None,
    }
}

/// The local mirror of the shared no-project sentinel document.
#[must_use]
pub fn sentinel_project() -> Project {
    Project {
        id: NONE_SENTINEL.to_string(),
        name: NONE_SENTINEL.to_string(),
        description: String::new(),
        subjects: vec![NONE_SENTINEL.to_string()],
        status: EntityStatus::Active,
        due_date: None,
        due_time: None,
    }
}
