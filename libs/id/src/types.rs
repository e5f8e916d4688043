//! Typed ID definitions for provisioning resources.

use crate::define_id;

define_id!(OrganizationId, "organization ID");
define_id!(TemplateId, "template ID");
define_id!(ClusterId, "cluster ID");
define_id!(NodePoolId, "node pool ID");
