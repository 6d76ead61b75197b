use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    PlanId,
    DiscountAmount,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CoursePlans {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // stored upper-case; lookups normalise the input the same way
                    .col(ColumnDef::new(Coupons::Code).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Coupons::PlanId).big_integer().null())
                    .col(ColumnDef::new(Coupons::DiscountAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Coupons::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Coupons::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coupons_plan")
                            .from(Coupons::Table, Coupons::PlanId)
                            .to(CoursePlans::Table, CoursePlans::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await?;
        Ok(())
    }
}
