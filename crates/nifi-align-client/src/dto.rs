//! Wire types of the NiFi REST API
//!
//! Only the fields the aligner needs are modelled; everything else in the
//! payload is ignored. Element lists are kept as raw JSON since only their
//! length matters.

use chrono::{DateTime, Utc};
use nifi_align_core::{FlowContents, FlowSnapshot, GroupId, GroupRef, Position, Revision};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::timestamp;

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty_groups<'de, D>(deserializer: D) -> Result<Vec<ProcessGroupEntity>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ProcessGroupEntity>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `GET /flow/process-groups/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupFlowEntity {
    /// Flow of the requested group
    pub process_group_flow: ProcessGroupFlowDto,
}

/// A group and its immediate contents
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupFlowDto {
    /// Group id
    pub id: String,
    /// Parent group id, absent for the root group
    #[serde(default)]
    pub parent_group_id: Option<String>,
    /// Contents
    #[serde(default)]
    pub flow: FlowDto,
    /// When the server rendered the flow
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// Components directly inside a group
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDto {
    /// Child process groups in server order
    #[serde(default, deserialize_with = "null_as_empty_groups")]
    pub process_groups: Vec<ProcessGroupEntity>,
    /// Remote process groups
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remote_process_groups: Vec<Value>,
    /// Processors
    #[serde(default, deserialize_with = "null_as_empty")]
    pub processors: Vec<Value>,
    /// Input ports
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input_ports: Vec<Value>,
    /// Output ports
    #[serde(default, deserialize_with = "null_as_empty")]
    pub output_ports: Vec<Value>,
    /// Connections
    #[serde(default, deserialize_with = "null_as_empty")]
    pub connections: Vec<Value>,
    /// Funnels
    #[serde(default, deserialize_with = "null_as_empty")]
    pub funnels: Vec<Value>,
    /// Labels
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<Value>,
}

/// Child group entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupEntity {
    /// Group id
    pub id: String,
    /// Revision to echo back on update
    pub revision: Revision,
    /// Component details, absent when the user lacks read permission
    #[serde(default)]
    pub component: Option<ProcessGroupComponent>,
}

/// Component details of a child group
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupComponent {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Current position
    #[serde(default)]
    pub position: Option<Position>,
}

/// Body of `PUT /process-groups/{id}` moving a group
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupPositionUpdate<'a> {
    /// Revision read with the parent snapshot
    pub revision: &'a Revision,
    /// Changed component fields
    pub component: PositionComponent<'a>,
}

/// Component fragment carrying only the new position
#[derive(Debug, Serialize)]
pub struct PositionComponent<'a> {
    /// Group id
    pub id: &'a str,
    /// New position
    pub position: Position,
}

impl<'a> ProcessGroupPositionUpdate<'a> {
    /// Update moving `group` to `position`
    pub fn new(group: &'a GroupRef, position: Position) -> Self {
        Self {
            revision: &group.revision,
            component: PositionComponent {
                id: group.id.as_str(),
                position,
            },
        }
    }
}

impl FlowDto {
    /// Counts of elements that prevent alignment; labels are left out
    pub fn contents(&self) -> FlowContents {
        FlowContents {
            processors: self.processors.len(),
            connections: self.connections.len(),
            funnels: self.funnels.len(),
            input_ports: self.input_ports.len(),
            output_ports: self.output_ports.len(),
            remote_process_groups: self.remote_process_groups.len(),
        }
    }
}

impl From<ProcessGroupFlowEntity> for FlowSnapshot {
    fn from(entity: ProcessGroupFlowEntity) -> Self {
        let dto = entity.process_group_flow;
        let contents = dto.flow.contents();
        let child_groups = dto
            .flow
            .process_groups
            .into_iter()
            .map(|pg| GroupRef {
                id: GroupId::new(pg.id),
                revision: pg.revision,
            })
            .collect();

        FlowSnapshot {
            group_id: GroupId::new(dto.id),
            child_groups,
            contents,
            last_refreshed: dto.last_refreshed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_flow_entity() {
        let payload = json!({
            "processGroupFlow": {
                "id": "root-id",
                "breadcrumb": {"id": "root-id"},
                "flow": {
                    "processGroups": [
                        {"id": "b", "revision": {"version": 2}, "component": {"name": "B", "position": {"x": 5.0, "y": 7.0}}},
                        {"id": "a", "revision": {"version": 0, "clientId": "c1"}}
                    ],
                    "labels": [{"id": "label"}],
                    "processors": [],
                    "connections": []
                },
                "lastRefreshed": "10:20:30 UTC"
            }
        });

        let entity: ProcessGroupFlowEntity = serde_json::from_value(payload).unwrap();
        let snapshot = FlowSnapshot::from(entity);

        assert_eq!(snapshot.group_id, GroupId::new("root-id"));
        let ids: Vec<&str> = snapshot.child_groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(snapshot.child_groups[1].revision.client_id.as_deref(), Some("c1"));
        assert!(snapshot.is_eligible(), "labels must not block alignment");
        assert!(snapshot.last_refreshed.is_some());
    }

    #[test]
    fn test_null_lists_decode_as_empty() {
        let payload = json!({
            "processGroupFlow": {
                "id": "g",
                "flow": {"processGroups": null, "processors": null, "funnels": [{"id": "f"}]}
            }
        });

        let entity: ProcessGroupFlowEntity = serde_json::from_value(payload).unwrap();
        let snapshot = FlowSnapshot::from(entity);
        assert!(snapshot.child_groups.is_empty());
        assert_eq!(snapshot.contents.funnels, 1);
        assert!(!snapshot.is_eligible());
    }

    #[test]
    fn test_unknown_timestamp_format_is_ignored() {
        let payload = json!({
            "processGroupFlow": {
                "id": "g",
                "flow": {"processGroups": [{"id": "c", "revision": {"version": 0}}]},
                "lastRefreshed": "2024-01-01T00:00:00Z"
            }
        });

        let entity: ProcessGroupFlowEntity = serde_json::from_value(payload).unwrap();
        let snapshot = FlowSnapshot::from(entity);
        assert_eq!(snapshot.last_refreshed, None);
        assert_eq!(snapshot.child_groups.len(), 1);
    }

    #[test]
    fn test_position_update_body() {
        let group = GroupRef::new(
            "g1",
            Revision {
                version: 4,
                client_id: Some("cli".to_string()),
                last_modifier: None,
            },
        );
        let body = serde_json::to_value(ProcessGroupPositionUpdate::new(&group, Position::new(394.0, 186.0))).unwrap();

        assert_eq!(
            body,
            json!({
                "revision": {"version": 4, "clientId": "cli"},
                "component": {"id": "g1", "position": {"x": 394.0, "y": 186.0}}
            })
        );
    }
}
