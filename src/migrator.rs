use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_location_tables::Migration),
            Box::new(m20240101_000002_create_stock_tables::Migration),
            Box::new(m20240101_000003_create_prv_tables::Migration),
            Box::new(m20240101_000004_create_delivery_note_tables::Migration),
            Box::new(m20240101_000005_create_users_table::Migration),
            Box::new(m20240101_000006_seed_admin_user::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_location_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_location_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BusinessUnits::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BusinessUnits::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BusinessUnits::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(BusinessUnits::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Regions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Regions::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Regions::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Regions::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::BusinessUnitId).uuid().not_null())
                        .col(ColumnDef::new(Clients::ContactPerson).string().null())
                        .col(ColumnDef::new(Clients::ContactNumber).string().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_clients_business_unit")
                                .from(Clients::Table, Clients::BusinessUnitId)
                                .to(BusinessUnits::Table, BusinessUnits::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Sites::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sites::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sites::Name).string().not_null())
                        .col(ColumnDef::new(Sites::ClientId).uuid().null())
                        .col(ColumnDef::new(Sites::RegionId).uuid().null())
                        .col(ColumnDef::new(Sites::Address).string().null())
                        .col(ColumnDef::new(Sites::Latitude).double().null())
                        .col(ColumnDef::new(Sites::Longitude).double().null())
                        .col(ColumnDef::new(Sites::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sites_client")
                                .from(Sites::Table, Sites::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sites_region")
                                .from(Sites::Table, Sites::RegionId)
                                .to(Regions::Table, Regions::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Technicians::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Technicians::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Technicians::FullName).string().not_null())
                        .col(ColumnDef::new(Technicians::Email).string().null())
                        .col(ColumnDef::new(Technicians::Phone).string().null())
                        .col(ColumnDef::new(Technicians::BusinessUnitId).uuid().null())
                        .col(
                            ColumnDef::new(Technicians::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sites_client_id")
                        .table(Sites::Table)
                        .col(Sites::ClientId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Technicians::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sites::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Regions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BusinessUnits::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum BusinessUnits {
        Table,
        Id,
        Name,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum Regions {
        Table,
        Id,
        Name,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum Clients {
        Table,
        Id,
        Name,
        BusinessUnitId,
        ContactPerson,
        ContactNumber,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum Sites {
        Table,
        Id,
        Name,
        ClientId,
        RegionId,
        Address,
        Latitude,
        Longitude,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum Technicians {
        Table,
        Id,
        FullName,
        Email,
        Phone,
        BusinessUnitId,
        CreatedAt,
    }
}

mod m20240101_000002_create_stock_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_stock_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Consumables::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Consumables::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Consumables::Supplier).string().not_null())
                        .col(
                            ColumnDef::new(Consumables::ConsumableType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Consumables::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Consumables::User).string().not_null())
                        .col(ColumnDef::new(Consumables::Location).string().not_null())
                        .col(
                            ColumnDef::new(Consumables::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Consumables::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Allocation looks rows up by (type, description, location)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_consumables_identity")
                        .table(Consumables::Table)
                        .col(Consumables::ConsumableType)
                        .col(Consumables::Description)
                        .col(Consumables::Location)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SerialStock::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SerialStock::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SerialStock::Supplier).string().not_null())
                        .col(
                            ColumnDef::new(SerialStock::SerialNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(SerialStock::Description)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SerialStock::Make).string().not_null())
                        .col(ColumnDef::new(SerialStock::Model).string().not_null())
                        .col(ColumnDef::new(SerialStock::Status).string().not_null())
                        .col(ColumnDef::new(SerialStock::Note).string().null())
                        .col(ColumnDef::new(SerialStock::Size).string().null())
                        .col(ColumnDef::new(SerialStock::Location).string().not_null())
                        .col(
                            ColumnDef::new(SerialStock::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SerialStock::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SimCards::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(SimCards::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(SimCards::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(SimCards::Network).string().not_null())
                        .col(ColumnDef::new(SimCards::Status).string().not_null())
                        .col(ColumnDef::new(SimCards::AssignedTo).string().null())
                        .col(ColumnDef::new(SimCards::Location).string().null())
                        .col(ColumnDef::new(SimCards::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MobileDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MobileDevices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MobileDevices::Make).string().not_null())
                        .col(ColumnDef::new(MobileDevices::Model).string().not_null())
                        .col(
                            ColumnDef::new(MobileDevices::Imei)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(MobileDevices::Status).string().not_null())
                        .col(ColumnDef::new(MobileDevices::AssignedTo).string().null())
                        .col(
                            ColumnDef::new(MobileDevices::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MobileDevices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SimCards::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SerialStock::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Consumables::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Consumables {
        Table,
        Id,
        Supplier,
        ConsumableType,
        Description,
        User,
        Location,
        Quantity,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum SerialStock {
        Table,
        Id,
        Supplier,
        SerialNumber,
        Description,
        Make,
        Model,
        Status,
        Note,
        Size,
        Location,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum SimCards {
        Table,
        Id,
        Number,
        Network,
        Status,
        AssignedTo,
        Location,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum MobileDevices {
        Table,
        Id,
        Make,
        Model,
        Imei,
        Status,
        AssignedTo,
        CreatedAt,
    }
}

mod m20240101_000003_create_prv_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_prv_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PrvDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PrvDevices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PrvDevices::SiteId).uuid().not_null())
                        .col(ColumnDef::new(PrvDevices::PrvName).string().not_null())
                        .col(ColumnDef::new(PrvDevices::ValveMake).string().null())
                        .col(ColumnDef::new(PrvDevices::ValveModel).string().null())
                        .col(ColumnDef::new(PrvDevices::ValveSizeMm).integer().null())
                        .col(
                            ColumnDef::new(PrvDevices::ValveSerialNumber)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::PilotMake).string().null())
                        .col(ColumnDef::new(PrvDevices::PilotModel).string().null())
                        .col(
                            ColumnDef::new(PrvDevices::InletPressureKpa)
                                .double()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::OutletPressureKpa)
                                .double()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::DesignFlowLs).double().null())
                        .col(ColumnDef::new(PrvDevices::PressureZone).string().null())
                        .col(
                            ColumnDef::new(PrvDevices::SupplyDescription)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::ChamberType).string().null())
                        .col(ColumnDef::new(PrvDevices::ChamberCondition).string().null())
                        .col(
                            ColumnDef::new(PrvDevices::ChamberLidCondition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::ValveCondition).string().null())
                        .col(ColumnDef::new(PrvDevices::PilotCondition).string().null())
                        .col(ColumnDef::new(PrvDevices::StrainerFitted).boolean().null())
                        .col(
                            ColumnDef::new(PrvDevices::StrainerCondition)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::IsolatingValveUpstream)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::IsolatingValveDownstream)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::IsolatingValveCondition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::AirValveFitted).boolean().null())
                        .col(
                            ColumnDef::new(PrvDevices::AirValveCondition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::BypassFitted).boolean().null())
                        .col(ColumnDef::new(PrvDevices::BypassCondition).string().null())
                        .col(
                            ColumnDef::new(PrvDevices::GaugeUpstreamFitted)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::GaugeDownstreamFitted)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::BallValvesFitted)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PrvDevices::PipeworkCondition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::LeaksObserved).boolean().null())
                        .col(
                            ColumnDef::new(PrvDevices::VandalismObserved)
                                .boolean()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::AccessNotes).string().null())
                        .col(ColumnDef::new(PrvDevices::InstallationDate).date().null())
                        .col(
                            ColumnDef::new(PrvDevices::LastInspectionDate)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(PrvDevices::Latitude).double().null())
                        .col(ColumnDef::new(PrvDevices::Longitude).double().null())
                        .col(ColumnDef::new(PrvDevices::GeneralNotes).string().null())
                        .col(ColumnDef::new(PrvDevices::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_prv_devices_site")
                                .from(PrvDevices::Table, PrvDevices::SiteId)
                                .to(
                                    super::m20240101_000001_create_location_tables::Sites::Table,
                                    super::m20240101_000001_create_location_tables::Sites::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PrvServices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PrvServices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrvServices::PrvDeviceId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PrvServices::LastServiceDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrvServices::NextServiceDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrvServices::ServiceIntervalMonths)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PrvServices::ServiceType).string().not_null())
                        .col(
                            ColumnDef::new(PrvServices::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrvServices::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_prv_services_device")
                                .from(PrvServices::Table, PrvServices::PrvDeviceId)
                                .to(PrvDevices::Table, PrvDevices::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceDocuments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceDocuments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceDocuments::PrvServiceId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceDocuments::FileName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceDocuments::FilePath)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceDocuments::AttachmentType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceDocuments::UploadDate)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_documents_service")
                                .from(ServiceDocuments::Table, ServiceDocuments::PrvServiceId)
                                .to(PrvServices::Table, PrvServices::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_prv_services_next_date")
                        .table(PrvServices::Table)
                        .col(PrvServices::NextServiceDate)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceDocuments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PrvServices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PrvDevices::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum PrvDevices {
        Table,
        Id,
        SiteId,
        PrvName,
        ValveMake,
        ValveModel,
        ValveSizeMm,
        ValveSerialNumber,
        PilotMake,
        PilotModel,
        InletPressureKpa,
        OutletPressureKpa,
        DesignFlowLs,
        PressureZone,
        SupplyDescription,
        ChamberType,
        ChamberCondition,
        ChamberLidCondition,
        ValveCondition,
        PilotCondition,
        StrainerFitted,
        StrainerCondition,
        IsolatingValveUpstream,
        IsolatingValveDownstream,
        IsolatingValveCondition,
        AirValveFitted,
        AirValveCondition,
        BypassFitted,
        BypassCondition,
        GaugeUpstreamFitted,
        GaugeDownstreamFitted,
        BallValvesFitted,
        PipeworkCondition,
        LeaksObserved,
        VandalismObserved,
        AccessNotes,
        InstallationDate,
        LastInspectionDate,
        Latitude,
        Longitude,
        GeneralNotes,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum PrvServices {
        Table,
        Id,
        PrvDeviceId,
        LastServiceDate,
        NextServiceDate,
        ServiceIntervalMonths,
        ServiceType,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum ServiceDocuments {
        Table,
        Id,
        PrvServiceId,
        FileName,
        FilePath,
        AttachmentType,
        UploadDate,
    }
}

mod m20240101_000004_create_delivery_note_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_delivery_note_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryNotes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryNotes::Sequence).integer().not_null())
                        .col(
                            ColumnDef::new(DeliveryNotes::DelNoteNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::NoteDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNotes::Destination)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryNotes::Comments).string().null())
                        .col(
                            ColumnDef::new(DeliveryNotes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryNoteItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryNoteItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::DeliveryNoteId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryNoteItems::SerialStockId)
                                .uuid()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_note_items_note")
                                .from(
                                    DeliveryNoteItems::Table,
                                    DeliveryNoteItems::DeliveryNoteId,
                                )
                                .to(DeliveryNotes::Table, DeliveryNotes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_note_items_stock")
                                .from(DeliveryNoteItems::Table, DeliveryNoteItems::SerialStockId)
                                .to(
                                    super::m20240101_000002_create_stock_tables::SerialStock::Table,
                                    super::m20240101_000002_create_stock_tables::SerialStock::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryNoteItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeliveryNotes::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum DeliveryNotes {
        Table,
        Id,
        Sequence,
        DelNoteNumber,
        NoteDate,
        Destination,
        Comments,
        CreatedAt,
    }

    #[derive(Iden)]
    pub enum DeliveryNoteItems {
        Table,
        Id,
        DeliveryNoteId,
        SerialStockId,
    }
}

mod m20240101_000005_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        Role,
        CreatedAt,
    }
}

mod m20240101_000006_seed_admin_user {
    use sea_orm_migration::prelude::*;
    use sea_orm_migration::sea_orm::ConnectionTrait;

    /// Seeds the default administrative account. The original system created
    /// this inline on first request; here it is an idempotent migration so
    /// request handling never carries an existence check.
    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_seed_admin_user"
        }
    }

    const ADMIN_USERNAME: &str = "admin";

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        Role,
        CreatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let db = manager.get_connection();
            let backend = db.get_database_backend();

            let select = Query::select()
                .column(Users::Id)
                .from(Users::Table)
                .and_where(Expr::col(Users::Username).eq(ADMIN_USERNAME))
                .to_owned();
            if db.query_one(backend.build(&select)).await?.is_some() {
                return Ok(());
            }

            let password = std::env::var("APP__ADMIN_SEED_PASSWORD")
                .unwrap_or_else(|_| "change-me-on-first-login".to_string());
            let hash = crate::auth::hash_password(&password);

            let insert = Query::insert()
                .into_table(Users::Table)
                .columns([
                    Users::Id,
                    Users::Username,
                    Users::PasswordHash,
                    Users::Role,
                    Users::CreatedAt,
                ])
                .values_panic([
                    uuid::Uuid::new_v4().into(),
                    ADMIN_USERNAME.into(),
                    hash.into(),
                    crate::auth::ROLE_ADMIN.into(),
                    chrono::Utc::now().into(),
                ])
                .to_owned();
            db.execute(backend.build(&insert)).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let db = manager.get_connection();
            let delete = Query::delete()
                .from_table(Users::Table)
                .and_where(Expr::col(Users::Username).eq(ADMIN_USERNAME))
                .to_owned();
            db.execute(db.get_database_backend().build(&delete)).await?;
            Ok(())
        }
    }
}
