//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};
use truenavi_lib::{Coordinates, EdgeUpdate, NewEdge, NewNode, NodeUpdate};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn bad_request(detail: impl Into<String>, request_id: &str) -> Box<ProblemDetails> {
    Box::new(ProblemDetails::bad_request(detail, request_id))
}

/// Parse a JSON `[latitude, longitude]` array.
fn parse_coordinates(
    values: &[f64],
    field: &str,
    request_id: &str,
) -> Result<Coordinates, Box<ProblemDetails>> {
    Coordinates::from_slice(values)
        .map_err(|e| bad_request(format!("The '{}' field is invalid: {}", field, e), request_id))
}

fn parse_waypoints(
    waypoints: &[Vec<f64>],
    request_id: &str,
) -> Result<Vec<Coordinates>, Box<ProblemDetails>> {
    waypoints
        .iter()
        .enumerate()
        .map(|(index, values)| {
            parse_coordinates(values, &format!("waypoints[{index}]"), request_id)
        })
        .collect()
}

fn require_id(value: &str, field: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if value.trim().is_empty() {
        return Err(bad_request(
            format!("The '{}' field is required and cannot be empty", field),
            request_id,
        ));
    }
    Ok(())
}

/// Body of `POST /api/v1/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `[latitude, longitude]` in degrees.
    pub coordinates: Vec<f64>,
}

impl Validate for CreateNodeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        parse_coordinates(&self.coordinates, "coordinates", request_id).map(|_| ())
    }
}

impl CreateNodeRequest {
    /// Validate and convert into the library insert type.
    pub fn into_new_node(self, request_id: &str) -> Result<NewNode, Box<ProblemDetails>> {
        let coordinates = parse_coordinates(&self.coordinates, "coordinates", request_id)?;
        Ok(NewNode {
            name: self.name,
            coordinates,
        })
    }
}

/// Body of `PUT /api/v1/nodes/{id}`. Omitted fields keep their stored value;
/// an empty `name` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNodeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
}

impl Validate for UpdateNodeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.name.is_none() && self.coordinates.is_none() {
            return Err(bad_request(
                "At least one of 'name' or 'coordinates' must be provided",
                request_id,
            ));
        }
        if let Some(coordinates) = &self.coordinates {
            parse_coordinates(coordinates, "coordinates", request_id)?;
        }
        Ok(())
    }
}

impl UpdateNodeRequest {
    pub fn into_update(self, request_id: &str) -> Result<NodeUpdate, Box<ProblemDetails>> {
        self.validate(request_id)?;
        let coordinates = self
            .coordinates
            .as_deref()
            .map(|values| parse_coordinates(values, "coordinates", request_id))
            .transpose()?;
        Ok(NodeUpdate {
            name: self.name,
            coordinates,
        })
    }
}

/// Body of `POST /api/v1/edges`.
///
/// Any `distance` sent by the client is ignored; it is always derived from the
/// endpoint nodes and waypoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEdgeRequest {
    pub start: String,
    pub end: String,

    /// Intermediate `[latitude, longitude]` points in travel order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Vec<f64>>,
}

impl Validate for CreateEdgeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require_id(&self.start, "start", request_id)?;
        require_id(&self.end, "end", request_id)?;
        if self.start == self.end {
            return Err(bad_request(
                "The 'start' and 'end' nodes must be different",
                request_id,
            ));
        }
        parse_waypoints(&self.waypoints, request_id).map(|_| ())
    }
}

impl CreateEdgeRequest {
    pub fn into_new_edge(self, request_id: &str) -> Result<NewEdge, Box<ProblemDetails>> {
        self.validate(request_id)?;
        let waypoints = parse_waypoints(&self.waypoints, request_id)?;
        Ok(NewEdge {
            start: self.start,
            end: self.end,
            waypoints,
        })
    }
}

/// Body of `PUT /api/v1/edges/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEdgeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Replaces the whole waypoint list; `[]` removes all waypoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Vec<f64>>>,
}

impl Validate for UpdateEdgeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.start.is_none() && self.end.is_none() && self.waypoints.is_none() {
            return Err(bad_request(
                "At least one of 'start', 'end' or 'waypoints' must be provided",
                request_id,
            ));
        }
        if let Some(start) = &self.start {
            require_id(start, "start", request_id)?;
        }
        if let Some(end) = &self.end {
            require_id(end, "end", request_id)?;
        }
        if let Some(waypoints) = &self.waypoints {
            parse_waypoints(waypoints, request_id)?;
        }
        Ok(())
    }
}

impl UpdateEdgeRequest {
    pub fn into_update(self, request_id: &str) -> Result<EdgeUpdate, Box<ProblemDetails>> {
        self.validate(request_id)?;
        let waypoints = self
            .waypoints
            .as_deref()
            .map(|waypoints| parse_waypoints(waypoints, request_id))
            .transpose()?;
        Ok(EdgeUpdate {
            start: self.start,
            end: self.end,
            waypoints,
        })
    }
}

/// Request for computing a route between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Starting node identifier.
    pub from: String,

    /// Destination node identifier.
    pub to: String,
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require_id(&self.from, "from", request_id)?;
        require_id(&self.to, "to", request_id)
    }
}

/// Path parameters of `GET /api/v1/nodes/radius/{lat}/{lng}/{distance_km}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub center: Coordinates,
    /// Search radius in meters.
    pub radius_meters: f64,
}

impl RadiusQuery {
    /// Parse raw path segments. The distance is given in kilometers.
    pub fn parse(
        lat: &str,
        lng: &str,
        distance_km: &str,
        request_id: &str,
    ) -> Result<Self, Box<ProblemDetails>> {
        let number = |value: &str, field: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| bad_request(format!("The '{}' segment must be a number", field), request_id))
        };

        let query = Self {
            center: Coordinates::new(number(lat, "lat")?, number(lng, "lng")?),
            radius_meters: number(distance_km, "distance")? * 1000.0,
        };
        query.validate(request_id)?;
        Ok(query)
    }
}

impl Validate for RadiusQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.center
            .validate()
            .map_err(|e| bad_request(format!("The search center is invalid: {}", e), request_id))?;
        if !self.radius_meters.is_finite() || self.radius_meters < 0.0 {
            return Err(bad_request(
                "The 'distance' segment must be a non-negative number",
                request_id,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(problem: Box<ProblemDetails>) -> String {
        problem.detail.unwrap_or_default()
    }

    #[test]
    fn test_create_node_request_valid() {
        let req: CreateNodeRequest =
            serde_json::from_str(r#"{"name":"Gate","coordinates":[51.5,-0.12]}"#).unwrap();
        let node = req.into_new_node("test").unwrap();
        assert_eq!(node.coordinates, Coordinates::new(51.5, -0.12));
        assert_eq!(node.name.as_deref(), Some("Gate"));
    }

    #[test]
    fn test_create_node_request_wrong_arity() {
        let req = CreateNodeRequest {
            name: None,
            coordinates: vec![1.0, 2.0, 3.0],
        };
        let err = req.validate("test").unwrap_err();
        assert_eq!(err.status, 400);
        assert!(detail(err).contains("'coordinates'"));
    }

    #[test]
    fn test_create_node_request_out_of_range() {
        let req = CreateNodeRequest {
            name: None,
            coordinates: vec![91.0, 0.0],
        };
        assert!(req.into_new_node("test").is_err());
    }

    #[test]
    fn test_update_node_request_requires_a_field() {
        let err = UpdateNodeRequest::default().validate("test").unwrap_err();
        assert!(detail(err).contains("At least one"));
    }

    #[test]
    fn test_update_node_request_name_only() {
        let req = UpdateNodeRequest {
            name: Some("Renamed".to_string()),
            coordinates: None,
        };
        let update = req.into_update("test").unwrap();
        assert_eq!(update.name.as_deref(), Some("Renamed"));
        assert!(update.coordinates.is_none());
    }

    #[test]
    fn test_create_edge_request_rejects_self_loop() {
        let req = CreateEdgeRequest {
            start: "a".to_string(),
            end: "a".to_string(),
            waypoints: vec![],
        };
        assert!(detail(req.validate("test").unwrap_err()).contains("different"));
    }

    #[test]
    fn test_create_edge_request_empty_start() {
        let req = CreateEdgeRequest {
            start: " ".to_string(),
            end: "b".to_string(),
            waypoints: vec![],
        };
        assert!(detail(req.validate("test").unwrap_err()).contains("'start'"));
    }

    #[test]
    fn test_create_edge_request_bad_waypoint() {
        let req = CreateEdgeRequest {
            start: "a".to_string(),
            end: "b".to_string(),
            waypoints: vec![vec![1.0, 1.0], vec![1.0]],
        };
        assert!(detail(req.validate("test").unwrap_err()).contains("waypoints[1]"));
    }

    #[test]
    fn test_create_edge_request_ignores_client_distance() {
        let req: CreateEdgeRequest = serde_json::from_str(
            r#"{"start":"a","end":"b","waypoints":[[0.5,0.5]],"distance":1}"#,
        )
        .unwrap();
        let edge = req.into_new_edge("test").unwrap();
        assert_eq!(edge.waypoints, vec![Coordinates::new(0.5, 0.5)]);
    }

    #[test]
    fn test_update_edge_request_clear_waypoints() {
        let req: UpdateEdgeRequest = serde_json::from_str(r#"{"waypoints":[]}"#).unwrap();
        let update = req.into_update("test").unwrap();
        assert_eq!(update.waypoints, Some(vec![]));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_route_request_empty_to() {
        let req = RouteRequest {
            from: "a".to_string(),
            to: "   ".to_string(),
        };
        assert!(detail(req.validate("test").unwrap_err()).contains("'to'"));
    }

    #[test]
    fn test_radius_query_converts_kilometers() {
        let query = RadiusQuery::parse("10", "20", "2.5", "test").unwrap();
        assert_eq!(query.center, Coordinates::new(10.0, 20.0));
        assert_eq!(query.radius_meters, 2500.0);
    }

    #[test]
    fn test_radius_query_rejects_bad_segments() {
        assert!(RadiusQuery::parse("abc", "20", "1", "test").is_err());
        assert!(RadiusQuery::parse("10", "200", "1", "test").is_err());
        assert!(RadiusQuery::parse("10", "20", "-1", "test").is_err());
    }
}
